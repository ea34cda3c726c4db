// src/reports/export_xlsx.rs

use crate::domain::record::AnalyzedProperty;
use crate::errors::ServerError;
use crate::format;
use crate::responses::{xlsx_response, ResultResp};
use rust_xlsxwriter::{Workbook, XlsxError};

/// Writes the derived detail table as a spreadsheet download.
pub fn export_properties_xlsx(rows: &[&AnalyzedProperty], filename: &str) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let x = |e: XlsxError| ServerError::XlsxError(e.to_string());

    // Headers
    let headers = [
        "ID",
        "Property",
        "Status",
        "Listing Type",
        "State",
        "County",
        "Acres",
        "Purchase Date",
        "MLS Listing Date",
        "Cost Basis",
        "Current Price",
        "Margin",
        "Margin %",
        "Markup %",
        "Price/Acre",
        "Cost/Acre",
        "Original Price",
        "%OLP",
        "Days Held",
        "Price Reductions",
        "Missing Information",
        "Active Leads",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).map_err(x)?;
    }

    // Rows
    for (i, prop) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let record = &prop.record;
        let d = &prop.derived;

        worksheet.write_string(r, 0, &record.id).map_err(x)?;
        worksheet.write_string(r, 1, &record.display_name).map_err(x)?;
        worksheet
            .write_string(r, 2, record.status_label())
            .map_err(x)?;
        worksheet
            .write_string(r, 3, record.listing_type().label())
            .map_err(x)?;
        worksheet
            .write_string(r, 4, record.state_label())
            .map_err(x)?;
        worksheet.write_string(r, 5, &record.county).map_err(x)?;
        worksheet
            .write_number(r, 6, record.surveyed_acres.unwrap_or(0.0))
            .map_err(x)?;
        worksheet
            .write_string(r, 7, &format::date(record.date_purchased))
            .map_err(x)?;
        worksheet
            .write_string(r, 8, &format::date(record.mls_listing_date))
            .map_err(x)?;
        worksheet
            .write_number(r, 9, record.cost_basis.unwrap_or(0.0))
            .map_err(x)?;
        worksheet
            .write_number(r, 10, record.asking_price.unwrap_or(0.0))
            .map_err(x)?;
        worksheet.write_number(r, 11, d.current_margin).map_err(x)?;
        worksheet
            .write_number(r, 12, d.current_margin_pct)
            .map_err(x)?;
        worksheet
            .write_number(r, 13, d.markup_percentage)
            .map_err(x)?;
        worksheet.write_number(r, 14, d.price_per_acre).map_err(x)?;
        worksheet
            .write_number(r, 15, d.cost_basis_per_acre)
            .map_err(x)?;
        worksheet
            .write_number(r, 16, record.original_listing_price.unwrap_or(0.0))
            .map_err(x)?;
        worksheet
            .write_number(r, 17, d.percent_of_initial_listing)
            .map_err(x)?;
        match d.days_held {
            Some(days) => worksheet.write_number(r, 18, days as f64).map_err(x)?,
            None => worksheet.write_string(r, 18, format::NA).map_err(x)?,
        };
        worksheet
            .write_number(r, 19, d.price_reductions as f64)
            .map_err(x)?;
        worksheet
            .write_string(r, 20, &d.completeness.label())
            .map_err(x)?;
        match &prop.leads {
            Some(lookup) => worksheet
                .write_number(r, 21, lookup.count as f64)
                .map_err(x)?,
            None => worksheet.write_string(r, 21, "").map_err(x)?,
        };
    }

    let buffer = workbook.save_to_buffer().map_err(x)?;

    xlsx_response(buffer, filename)
}
