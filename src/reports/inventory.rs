// src/reports/inventory.rs
//
// Legal-landscape inventory report: one table per status×listing-type
// section (Primary first, then a portfolio summary, then Secondary), a
// definitions glossary, and the standing disclaimer.

use crate::domain::aggregate::GroupStats;
use crate::domain::record::{AnalyzedProperty, ListingType};
use crate::errors::ServerError;
use crate::format;
use crate::reports::pdf_table::{Column, PdfBuilder, LEGAL_LANDSCAPE};
use chrono::{DateTime, Utc};

const ROW_SIZE: f64 = 6.5;

const HEADERS: [&str; 16] = [
    "Property",
    "Owner",
    "St",
    "County",
    "Acres",
    "Purchased",
    "Cost Basis",
    "Current Price",
    "Margin",
    "Margin %",
    "Markup %",
    "$/Acre",
    "Cost/Acre",
    "Orig. Price",
    "%OLP",
    "Days Held",
];

const COLUMNS: [Column; 16] = [
    Column { width: 34.0, wrap: true },  // property
    Column { width: 26.0, wrap: true },  // owner
    Column { width: 9.0, wrap: false },  // state
    Column { width: 20.0, wrap: true },  // county
    Column { width: 13.0, wrap: false }, // acres
    Column { width: 18.0, wrap: false }, // purchased
    Column { width: 21.0, wrap: false }, // cost basis
    Column { width: 21.0, wrap: false }, // current price
    Column { width: 21.0, wrap: false }, // margin
    Column { width: 13.0, wrap: false }, // margin %
    Column { width: 13.0, wrap: false }, // markup %
    Column { width: 17.0, wrap: false }, // $/acre
    Column { width: 17.0, wrap: false }, // cost/acre
    Column { width: 21.0, wrap: false }, // orig price
    Column { width: 12.0, wrap: false }, // %OLP
    Column { width: 12.0, wrap: false }, // days held
];

const DISCLAIMER: &str = "This report is generated from CRM export data for internal \
portfolio review only and does not constitute an appraisal, a survey, or an offer to \
sell real property.";

/// Renders the inventory report over an already filtered and sorted row set
/// (status priority, then state, then county).
pub fn inventory_pdf(
    rows: &[&AnalyzedProperty],
    generated: DateTime<Utc>,
) -> Result<Vec<u8>, ServerError> {
    let mut pdf = PdfBuilder::new("Land Portfolio Inventory Report", LEGAL_LANDSCAPE)?;

    pdf.text_line(16.0, true, "Land Portfolio Inventory Report");
    pdf.text_line(
        9.0,
        false,
        &format!(
            "Generated {} · {} properties",
            generated.format("%Y-%m-%d %H:%M UTC"),
            rows.len()
        ),
    );
    pdf.rule();

    let primary: Vec<&AnalyzedProperty> = rows
        .iter()
        .copied()
        .filter(|p| p.record.listing_type() == ListingType::Primary)
        .collect();
    let secondary: Vec<&AnalyzedProperty> = rows
        .iter()
        .copied()
        .filter(|p| p.record.listing_type() == ListingType::Secondary)
        .collect();

    // Primary sections, one per status, in the incoming (priority) order.
    let mut first_section = true;
    for (status, members) in sections_by_status(&primary) {
        render_section(&mut pdf, &status, "Primary", &members, &mut first_section);
    }

    render_portfolio_summary(&mut pdf, rows);

    for (status, members) in sections_by_status(&secondary) {
        render_section(&mut pdf, &status, "Secondary", &members, &mut first_section);
    }

    render_glossary(&mut pdf);

    pdf.finish()
}

/// Consecutive grouping by status label. Rows arrive sorted, so this yields
/// sections in status-priority order; empty inputs yield no sections at
/// all, which is how zero-record sections get omitted.
fn sections_by_status<'a>(
    rows: &[&'a AnalyzedProperty],
) -> Vec<(String, Vec<&'a AnalyzedProperty>)> {
    let mut sections: Vec<(String, Vec<&AnalyzedProperty>)> = Vec::new();
    for &row in rows {
        let status = row.record.status_label();
        match sections.last_mut() {
            Some((current, members)) if current == status => members.push(row),
            _ => sections.push((status.to_string(), vec![row])),
        }
    }
    sections
}

fn render_section(
    pdf: &mut PdfBuilder,
    status: &str,
    listing_type: &str,
    members: &[&AnalyzedProperty],
    first_section: &mut bool,
) {
    if !*first_section {
        pdf.new_page();
    }
    *first_section = false;

    pdf.heading(12.0, &format!("{status} - {listing_type} Listings"));
    pdf.gap(1.0);

    let header_cells: Vec<&str> = HEADERS.to_vec();
    pdf.table_row(&COLUMNS, &header_cells, ROW_SIZE, true);
    pdf.rule();

    for prop in members {
        let cells = row_cells(prop);
        let cell_refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        pdf.table_row(&COLUMNS, &cell_refs, ROW_SIZE, false);
    }

    pdf.rule();
    let stats = GroupStats::from_rows(members);
    pdf.text_line(
        8.0,
        true,
        &format!(
            "Subtotal: {} properties · {} acres · Cost Basis {} · Current Value {} · Margin {}",
            stats.count,
            format::acres(stats.total_acres),
            format::currency(stats.total_cost_basis),
            format::currency(stats.total_value),
            format::currency(stats.total_margin),
        ),
    );
}

fn row_cells(prop: &AnalyzedProperty) -> Vec<String> {
    let r = &prop.record;
    let d = &prop.derived;
    vec![
        if r.display_name.is_empty() {
            r.id.clone()
        } else {
            r.display_name.clone()
        },
        r.owner.clone().unwrap_or_default(),
        r.state_label().to_string(),
        r.county.clone(),
        format::acres_or_na(r.surveyed_acres),
        format::date(r.date_purchased),
        format::currency_or_na(r.cost_basis.unwrap_or(0.0)),
        format::currency_or_na(r.asking_price.unwrap_or(0.0)),
        format::currency_or_na(d.current_margin),
        format::percent_or_na(d.current_margin_pct),
        format::percent_or_na(d.markup_percentage),
        format::currency_or_na(d.price_per_acre),
        format::currency_or_na(d.cost_basis_per_acre),
        format::currency_or_na(r.original_listing_price.unwrap_or(0.0)),
        format::percent_or_na(d.percent_of_initial_listing),
        format::days(d.days_held),
    ]
}

fn render_portfolio_summary(pdf: &mut PdfBuilder, rows: &[&AnalyzedProperty]) {
    pdf.new_page();
    pdf.heading(13.0, "Portfolio Summary");
    pdf.rule();

    let stats = GroupStats::from_rows(rows);
    let lines = [
        format!("Total Properties: {}", stats.count),
        format!("Total Acres: {}", format::acres(stats.total_acres)),
        format!("Total Cost Basis: {}", format::currency(stats.total_cost_basis)),
        format!("Total Current Value: {}", format::currency(stats.total_value)),
        format!("Total Margin: {}", format::currency(stats.total_margin)),
        format!(
            "Avg Days Held: {}",
            match stats.avg_days_held {
                Some(d) => format!("{d:.0}"),
                None => format::NA.to_string(),
            }
        ),
        format!(
            "Avg Price Reductions: {:.1}",
            stats.avg_price_reductions
        ),
        format!(
            "Complete Records: {} of {}",
            stats.complete, stats.count
        ),
    ];
    for line in &lines {
        pdf.text_line(9.5, false, line);
    }
}

fn render_glossary(pdf: &mut PdfBuilder) {
    pdf.new_page();
    pdf.heading(13.0, "Definitions");
    pdf.rule();

    let definitions: [(&str, &str); 8] = [
        (
            "Status",
            "Lifecycle stage of a property: Purchased, Listed, Under Contract, or Off Market.",
        ),
        (
            "Listing Type",
            "Primary is the main record for an asset; Secondary is an alternate MLS or acreage listing of the same asset.",
        ),
        (
            "Cost Basis",
            "Total acquisition cost of the property.",
        ),
        (
            "Margin / Margin %",
            "Current asking price minus cost basis, and that margin as a percentage of the asking price.",
        ),
        (
            "Markup %",
            "Margin as a percentage of cost basis.",
        ),
        (
            "%OLP",
            "Current asking price as a percentage of the original listing price.",
        ),
        (
            "Days Held",
            "Elapsed days since the purchase date, as of report generation.",
        ),
        (
            "Price Reductions",
            "Estimated reduction count read from the trailing digit of the current price (9 means none, 0 means nine).",
        ),
    ];

    for (term, text) in definitions {
        pdf.text_line(9.5, true, term);
        for line in format::wrap_text(text, 110) {
            pdf.text_line(8.5, false, &line);
        }
        pdf.gap(1.5);
    }

    pdf.gap(4.0);
    pdf.rule();
    for line in format::wrap_text(DISCLAIMER, 110) {
        pdf.text_line(8.0, false, &line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregate::{filter_and_sort, ViewFilter};
    use crate::domain::derive;
    use crate::domain::record::PropertyRecord;
    use chrono::NaiveDate;

    fn record(id: &str, status: &str, listing_type: Option<&str>) -> PropertyRecord {
        PropertyRecord {
            id: id.to_string(),
            display_name: format!("Tract {id}"),
            status: Some(status.to_string()),
            state: Some("TX".to_string()),
            county: "Brewster".to_string(),
            listing_type_raw: listing_type.map(str::to_string),
            cost_basis: Some(100_000.0),
            asking_price: Some(150_000.0),
            original_listing_price: Some(180_000.0),
            surveyed_acres: Some(50.0),
            date_purchased: NaiveDate::from_ymd_opt(2023, 4, 1),
            mls_listing_date: None,
            apn: None,
            street_address: None,
            owner: Some("Highline Land LLC".to_string()),
            listing_number: None,
            mapright_url: None,
            gis_url: None,
            photos_url: None,
            listing_website_url: None,
            last_mapping_audit: None,
            avg_opportunity_value: None,
        }
    }

    #[test]
    fn sections_group_consecutive_statuses() {
        let analyzed = derive::analyze(vec![
            record("a", "Purchased", None),
            record("b", "Purchased", None),
            record("c", "Listed", None),
        ]);
        let rows = filter_and_sort(&analyzed, &ViewFilter::default());
        let sections = sections_by_status(&rows);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].0, "Purchased");
        assert_eq!(sections[0].1.len(), 2);
        assert_eq!(sections[1].0, "Listed");
    }

    #[test]
    fn empty_input_yields_no_sections() {
        assert!(sections_by_status(&[]).is_empty());
    }

    #[test]
    fn na_rendering_for_sparse_rows() {
        let mut sparse = record("s", "Listed", None);
        sparse.cost_basis = None;
        sparse.surveyed_acres = None;
        sparse.date_purchased = None;
        sparse.owner = None;
        let analyzed = derive::analyze(vec![sparse]);

        let cells = row_cells(&analyzed[0]);
        assert_eq!(cells[4], "N/A"); // acres
        assert_eq!(cells[5], "N/A"); // purchase date
        assert_eq!(cells[6], "N/A"); // cost basis
        assert_eq!(cells[15], "N/A"); // days held
    }

    #[test]
    fn inventory_renders_primary_and_secondary() {
        let analyzed = derive::analyze(vec![
            record("a", "Purchased", None),
            record("b", "Listed", Some("Secondary MLS Listing")),
        ]);
        let rows = filter_and_sort(&analyzed, &ViewFilter::default());
        let bytes = inventory_pdf(&rows, Utc::now()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
