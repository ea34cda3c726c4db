use crate::crm::leads::{enrich_portfolio, LeadClient};
use crate::domain::aggregate::{self, ViewFilter};
use crate::domain::derive;
use crate::domain::record::AnalyzedProperty;
use crate::errors::ServerError;
use crate::ingest;
use crate::reports;
use crate::responses::errors::status_code;
use crate::responses::{html_response, pdf_response, text_response, ResultResp};
use crate::store::{Portfolio, Store};
use crate::templates::pages::{
    dashboard_page, home_page, properties_page, DashboardVm, PropertiesVm,
};
use astra::Request;
use chrono::Utc;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

/// Everything a route handler needs, passed into the serve closure once.
#[derive(Clone)]
pub struct AppContext {
    pub store: Store,
    pub lead_client: Option<Arc<LeadClient>>,
}

pub fn handle(req: Request, ctx: &AppContext) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = parse_query(&req);

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => html_response(home_page(ctx.store.is_loaded())),
        ("POST", "/upload") => upload(req, &ctx.store),
        ("GET", "/dashboard") => dashboard(ctx),
        ("GET", "/properties") => properties(ctx, &query),
        ("GET", "/reports/checklist.pdf") => checklist_report(ctx, &query),
        ("GET", "/reports/inventory.pdf") => inventory_report(ctx, &query),
        ("GET", "/export/properties.xlsx") => xlsx_export(ctx, &query),
        ("POST", "/enrich") => enrich(ctx),
        _ => Err(ServerError::NotFound),
    }
}

/// Ingest + derive + publish. Replies are plain text so the upload page
/// script can show them inline next to the file input; a failed upload
/// publishes nothing.
fn upload(mut req: Request, store: &Store) -> ResultResp {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Could not read upload body: {e}")))?;

    match process_upload(&body, store) {
        Ok((count, skipped)) => text_response(
            200,
            &format!("Loaded {count} properties ({skipped} rows skipped)."),
        ),
        Err(err) => {
            eprintln!("❌ Upload failed: {err}");
            text_response(status_code(&err), &err.to_string())
        }
    }
}

fn process_upload(bytes: &[u8], store: &Store) -> Result<(usize, usize), ServerError> {
    let outcome = ingest::parse_portfolio(bytes)?;
    let skipped = outcome.skipped;
    let properties = derive::analyze(outcome.records);
    let count = properties.len();

    store.replace(Portfolio {
        properties,
        uploaded_at: Utc::now(),
        skipped_rows: skipped,
    })?;

    println!("✅ Portfolio loaded: {count} properties ({skipped} rows skipped)");
    Ok((count, skipped))
}

fn dashboard(ctx: &AppContext) -> ResultResp {
    let vm = ctx.store.with_portfolio(|portfolio| {
        let tree = aggregate::breakdown(&portfolio.properties);
        Ok(DashboardVm {
            summary: tree.summary.clone(),
            tree,
            state_counts: aggregate::count_by_state(&portfolio.properties),
            uploaded_at: portfolio
                .uploaded_at
                .format("%Y-%m-%d %H:%M UTC")
                .to_string(),
            skipped_rows: portfolio.skipped_rows,
            enrichment_enabled: ctx.lead_client.is_some(),
        })
    })?;
    html_response(dashboard_page(&vm))
}

fn properties(ctx: &AppContext, query: &HashMap<String, String>) -> ResultResp {
    let filter = filter_from_query(query);
    let vm = ctx.store.with_portfolio(|portfolio| {
        let rows: Vec<AnalyzedProperty> = aggregate::filter_and_sort(&portfolio.properties, &filter)
            .into_iter()
            .cloned()
            .collect();

        // Filter options come from the whole portfolio, not the filtered
        // view, so narrowing one dropdown never empties the others.
        let statuses = aggregate::breakdown(&portfolio.properties)
            .statuses
            .into_iter()
            .map(|g| g.status)
            .collect();
        let mut states: Vec<String> = portfolio
            .properties
            .iter()
            .map(|p| p.record.state_label().to_string())
            .collect();
        states.sort();
        states.dedup();
        let mut counties: Vec<String> = portfolio
            .properties
            .iter()
            .map(|p| p.record.county.clone())
            .collect();
        counties.sort();
        counties.dedup();

        let any_leads = portfolio.properties.iter().any(|p| p.leads.is_some());

        Ok(PropertiesVm {
            rows,
            filter: filter.clone(),
            statuses,
            states,
            counties,
            any_leads,
        })
    })?;
    html_response(properties_page(&vm))
}

fn checklist_report(ctx: &AppContext, query: &HashMap<String, String>) -> ResultResp {
    let filter = filter_from_query(query);
    let generated = Utc::now();
    let bytes = ctx.store.with_portfolio(|portfolio| {
        let rows = aggregate::filter_and_sort(&portfolio.properties, &filter);
        reports::checklist_pdf(&rows, generated)
    })?;
    let filename = format!(
        "missing_info_checklist_{}.pdf",
        generated.format("%Y%m%d_%H%M%S")
    );
    pdf_response(bytes, &filename)
}

fn inventory_report(ctx: &AppContext, query: &HashMap<String, String>) -> ResultResp {
    let filter = filter_from_query(query);
    let generated = Utc::now();
    let bytes = ctx.store.with_portfolio(|portfolio| {
        let rows = aggregate::filter_and_sort(&portfolio.properties, &filter);
        reports::inventory_pdf(&rows, generated)
    })?;
    let filename = format!(
        "inventory_report_{}.pdf",
        generated.format("%Y%m%d_%H%M%S")
    );
    pdf_response(bytes, &filename)
}

fn xlsx_export(ctx: &AppContext, query: &HashMap<String, String>) -> ResultResp {
    let filter = filter_from_query(query);
    let filename = format!(
        "portfolio_export_{}.xlsx",
        Utc::now().format("%Y%m%d_%H%M%S")
    );
    ctx.store.with_portfolio(|portfolio| {
        let rows = aggregate::filter_and_sort(&portfolio.properties, &filter);
        reports::export_properties_xlsx(&rows, &filename)
    })
}

/// Serial CRM lead enrichment. Plain-text replies land in the dashboard's
/// inline message element.
fn enrich(ctx: &AppContext) -> ResultResp {
    let client = match &ctx.lead_client {
        Some(client) => client,
        None => {
            return text_response(
                400,
                "CRM lead enrichment is not configured; set CRM_API_KEY and restart.",
            )
        }
    };

    match enrich_portfolio(&ctx.store, client) {
        Ok(summary) => text_response(
            200,
            &format!(
                "Enriched {} records: {} with active leads, {} lookups failed.",
                summary.records, summary.found, summary.errors
            ),
        ),
        Err(err) => text_response(status_code(&err), &err.to_string()),
    }
}

fn filter_from_query(query: &HashMap<String, String>) -> ViewFilter {
    let get = |key: &str| {
        query
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    ViewFilter {
        status: get("status"),
        state: get("state"),
        county: get("county"),
    }
}

fn parse_query(req: &astra::Request) -> HashMap<String, String> {
    let mut map = HashMap::new();

    if let Some(q) = req.uri().query() {
        for pair in q.split('&') {
            let mut parts = pair.splitn(2, '=');
            if let (Some(k), Some(v)) = (parts.next(), parts.next()) {
                map.insert(url_decode(k), url_decode(v));
            }
        }
    }

    map
}

/// Minimal percent-decoding; filter values carry spaces ("Under Contract").
fn url_decode(s: &str) -> String {
    let mut bytes = Vec::with_capacity(s.len());
    let mut chars = s.bytes().peekable();
    while let Some(b) = chars.next() {
        match b {
            b'+' => bytes.push(b' '),
            b'%' => {
                let hi = chars.next();
                let lo = chars.next();
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        let hex = [hi, lo];
                        match u8::from_str_radix(std::str::from_utf8(&hex).unwrap_or(""), 16) {
                            Ok(byte) => bytes.push(byte),
                            Err(_) => {
                                bytes.push(b'%');
                                bytes.push(hi);
                                bytes.push(lo);
                            }
                        }
                    }
                    _ => bytes.push(b'%'),
                }
            }
            other => bytes.push(other),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
