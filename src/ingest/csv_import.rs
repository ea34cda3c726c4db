// src/ingest/csv_import.rs
//
// Turns the uploaded CSV bytes into clean `PropertyRecord`s. This is the
// anti-corruption layer between the CRM export and the domain: column
// presence is resolved once against the header row, and every cell goes
// through the coercion rules here so nothing downstream ever re-parses.

use crate::domain::record::{PropertyRecord, UNKNOWN_COUNTY};
use crate::errors::ServerError;
use crate::ingest::fields;
use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::HashMap;

#[derive(Debug)]
pub struct IngestOutcome {
    pub records: Vec<PropertyRecord>,
    /// Rows dropped for having neither an id nor a display name.
    pub skipped: usize,
}

/// Parses a whole CRM export. Absent columns disable their dependent fields
/// (every cell read through them is `None`); a structurally broken file is
/// the one whole-file failure and publishes nothing.
pub fn parse_portfolio(bytes: &[u8]) -> Result<IngestOutcome, ServerError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ServerError::CsvError(format!("Could not read header row: {e}")))?
        .clone();

    let columns: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name, idx))
        .collect();

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row_idx, row) in reader.records().enumerate() {
        let row = row.map_err(|e| {
            ServerError::CsvError(format!("Row {} is malformed: {e}", row_idx + 2))
        })?;

        match row_to_record(&row, &columns) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if records.is_empty() {
        return Err(ServerError::BadRequest(
            "The CSV contained no property rows.".to_string(),
        ));
    }

    Ok(IngestOutcome { records, skipped })
}

fn row_to_record(row: &StringRecord, columns: &HashMap<&str, usize>) -> Option<PropertyRecord> {
    let cell = |name: &str| -> Option<&str> {
        columns
            .get(name)
            .and_then(|idx| row.get(*idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let id = cell(fields::ID).unwrap_or("").to_string();
    let display_name = cell(fields::DISPLAY_NAME).unwrap_or("").to_string();
    if id.is_empty() && display_name.is_empty() {
        return None;
    }

    Some(PropertyRecord {
        id,
        display_name,
        status: cell(fields::STATUS).map(str::to_string),
        state: cell(fields::STATE).map(str::to_string),
        county: normalize_county(cell(fields::COUNTY)),
        listing_type_raw: cell(fields::LISTING_TYPE).map(str::to_string),
        cost_basis: parse_money(cell(fields::COST_BASIS)),
        asking_price: parse_money(cell(fields::CURRENT_VALUE)),
        original_listing_price: parse_money(cell(fields::INITIAL_LISTING_PRICE)),
        surveyed_acres: parse_money(cell(fields::SURVEYED_ACRES)),
        date_purchased: parse_date(cell(fields::DATE_PURCHASED)),
        mls_listing_date: parse_date(cell(fields::MLS_LISTING_DATE)),
        apn: cell(fields::APN).map(str::to_string),
        street_address: cell(fields::STREET_ADDRESS).map(str::to_string),
        owner: cell(fields::OWNER).map(str::to_string),
        listing_number: cell(fields::LISTING_NUMBER).map(str::to_string),
        mapright_url: cell(fields::MAPRIGHT_URL).map(str::to_string),
        gis_url: cell(fields::GIS_URL).map(str::to_string),
        photos_url: cell(fields::PHOTOS_URL).map(str::to_string),
        listing_website_url: cell(fields::LISTING_WEBSITE_URL).map(str::to_string),
        last_mapping_audit: cell(fields::LAST_MAPPING_AUDIT).map(str::to_string),
        avg_opportunity_value: parse_money(cell(fields::AVG_OPPORTUNITY_VALUE)),
    })
}

/// Missing county -> the sentinel; otherwise title-cased so "brewster" and
/// "BREWSTER" land in one group. A county literally exported as "Unknown"
/// stays "Unknown" and groups separately from the sentinel.
fn normalize_county(cell: Option<&str>) -> String {
    match cell {
        Some(raw) => title_case(raw),
        None => UNKNOWN_COUNTY.to_string(),
    }
}

/// Title-casing that follows the CRM's own convention: a letter starts
/// uppercase after any non-letter, so "de witt" -> "De Witt" and
/// "o'brien" -> "O'Brien".
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Numeric coercion: absent/empty -> `None`; present but unparseable ->
/// `Some(0.0)` so row arithmetic never raises. Currency symbols, thousands
/// separators and percent signs are stripped first.
fn parse_money(cell: Option<&str>) -> Option<f64> {
    let raw = cell?;
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect();
    Some(cleaned.parse::<f64>().unwrap_or(0.0))
}

/// Date coercion: unparseable -> `None`. The CRM exports ISO dates, ISO
/// datetimes, and US-style dates depending on the field's age.
fn parse_date(cell: Option<&str>) -> Option<NaiveDate> {
    let raw = cell?;
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            return Some(d);
        }
    }
    // ISO datetime: keep the date prefix.
    if raw.len() >= 10 {
        if let Ok(d) = NaiveDate::parse_from_str(&raw[..10], "%Y-%m-%d") {
            return Some(d);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,display_name,primary_opportunity_status_label,primary_opportunity_value,custom.All_State,custom.All_County,custom.Asset_Cost_Basis,custom.All_Asset_Surveyed_Acres,custom.Asset_Date_Purchased";

    fn parse(body: &str) -> IngestOutcome {
        parse_portfolio(format!("{HEADER}\n{body}").as_bytes()).unwrap()
    }

    #[test]
    fn parses_a_plain_row() {
        let out = parse("prop_1,Smith Ranch,Listed,150000,TX,brewster,\"$100,000\",50,2023-04-01");
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.skipped, 0);

        let r = &out.records[0];
        assert_eq!(r.id, "prop_1");
        assert_eq!(r.status.as_deref(), Some("Listed"));
        assert_eq!(r.county, "Brewster");
        assert_eq!(r.cost_basis, Some(100_000.0));
        assert_eq!(r.asking_price, Some(150_000.0));
        assert_eq!(r.surveyed_acres, Some(50.0));
        assert_eq!(r.date_purchased, NaiveDate::from_ymd_opt(2023, 4, 1));
    }

    #[test]
    fn money_coercion_rules() {
        assert_eq!(parse_money(Some("$1,234.56")), Some(1234.56));
        assert_eq!(parse_money(Some("33.3%")), Some(33.3));
        assert_eq!(parse_money(Some("abc")), Some(0.0));
        assert_eq!(parse_money(None), None);
    }

    #[test]
    fn date_coercion_rules() {
        let expected = NaiveDate::from_ymd_opt(2023, 4, 1);
        assert_eq!(parse_date(Some("2023-04-01")), expected);
        assert_eq!(parse_date(Some("04/01/2023")), expected);
        assert_eq!(parse_date(Some("04/01/23")), expected);
        assert_eq!(parse_date(Some("2023-04-01T12:30:00+00:00")), expected);
        assert_eq!(parse_date(Some("not a date")), None);
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn missing_county_gets_sentinel_literal_unknown_does_not() {
        let out = parse(concat!(
            "prop_1,A,Listed,1,TX,,1,1,\n",
            "prop_2,B,Listed,1,TX,Unknown,1,1,\n",
            "prop_3,C,Listed,1,TX,UNKNOWN COUNTY,1,1,"
        ));
        assert_eq!(out.records[0].county, "Unknown County");
        assert_eq!(out.records[1].county, "Unknown");
        // A literal "unknown county" cell title-cases onto the sentinel.
        assert_eq!(out.records[2].county, "Unknown County");
    }

    #[test]
    fn absent_columns_disable_fields_without_error() {
        let out = parse_portfolio(b"id,display_name\nprop_1,Lone Tract\n").unwrap();
        let r = &out.records[0];
        assert_eq!(r.status, None);
        assert_eq!(r.cost_basis, None);
        assert_eq!(r.county, UNKNOWN_COUNTY);
    }

    #[test]
    fn rows_without_identity_are_skipped() {
        let out = parse("prop_1,Named,Listed,1,TX,Kerr,1,1,\n,,,,,,,,");
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.skipped, 1);
    }

    #[test]
    fn empty_file_is_a_whole_file_failure() {
        assert!(parse_portfolio(format!("{HEADER}\n").as_bytes()).is_err());
        assert!(parse_portfolio(b"").is_err());
    }

    #[test]
    fn title_case_follows_crm_convention() {
        assert_eq!(title_case("de witt"), "De Witt");
        assert_eq!(title_case("o'brien"), "O'Brien");
        assert_eq!(title_case("BREWSTER"), "Brewster");
    }
}
