// src/tests/router_tests/export_tests.rs

use crate::router::handle;
use crate::tests::utils::{body_bytes, content_type, get, make_ctx, upload_sample};

#[test]
fn checklist_pdf_downloads_with_timestamped_filename() {
    let ctx = make_ctx();
    upload_sample(&ctx);

    let mut resp = handle(get("/reports/checklist.pdf"), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(content_type(&resp), "application/pdf");

    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("missing_info_checklist_"));

    assert!(body_bytes(&mut resp).starts_with(b"%PDF"));
}

#[test]
fn inventory_pdf_downloads_and_respects_filters() {
    let ctx = make_ctx();
    upload_sample(&ctx);

    let mut resp = handle(get("/reports/inventory.pdf"), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(content_type(&resp), "application/pdf");
    let full = body_bytes(&mut resp);
    assert!(full.starts_with(b"%PDF"));

    // A narrow filter still yields a valid document.
    let mut resp = handle(get("/reports/inventory.pdf?status=Purchased"), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_bytes(&mut resp).starts_with(b"%PDF"));
}

#[test]
fn xlsx_export_downloads_a_workbook() {
    let ctx = make_ctx();
    upload_sample(&ctx);

    let mut resp = handle(get("/export/properties.xlsx"), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        content_type(&resp),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    // XLSX is a zip container.
    assert!(body_bytes(&mut resp).starts_with(b"PK"));
}
