// src/tests/router_tests/upload_tests.rs

use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, make_ctx, post, upload_sample, SAMPLE_CSV};

#[test]
fn upload_loads_portfolio_and_reports_counts() {
    let ctx = make_ctx();

    let mut resp = handle(post("/upload", SAMPLE_CSV), &ctx).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(&mut resp);
    assert!(
        body.contains("Loaded 5 properties"),
        "unexpected upload reply: {body}"
    );
    assert!(ctx.store.is_loaded());
}

#[test]
fn upload_replaces_previous_portfolio() {
    let ctx = make_ctx();
    upload_sample(&ctx);

    let smaller = "\
id,display_name,primary_opportunity_status_label,primary_opportunity_value
prop_9,Replacement Tract,Listed,99999
";
    let mut resp = handle(post("/upload", smaller), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(&mut resp).contains("Loaded 1 properties"));

    let count = ctx
        .store
        .with_portfolio(|p| Ok(p.properties.len()))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn empty_upload_fails_inline_and_publishes_nothing() {
    let ctx = make_ctx();

    let mut resp = handle(post("/upload", "id,display_name\n"), &ctx).unwrap();
    assert_eq!(resp.status(), 400);
    assert!(body_string(&mut resp).contains("no property rows"));
    assert!(!ctx.store.is_loaded());
}

#[test]
fn views_before_upload_report_missing_portfolio() {
    let ctx = make_ctx();

    for path in ["/dashboard", "/properties", "/reports/inventory.pdf"] {
        match handle(get(path), &ctx) {
            Err(err) => assert!(
                matches!(err, ServerError::NoPortfolio),
                "expected NoPortfolio for {path}, got {err}"
            ),
            Ok(_) => panic!("expected an error for {path} before any upload"),
        }
    }
}

#[test]
fn unknown_route_is_not_found() {
    let ctx = make_ctx();
    match handle(get("/nope"), &ctx) {
        Err(err) => assert!(matches!(err, ServerError::NotFound)),
        Ok(_) => panic!("expected NotFound for an unknown route"),
    }
}
