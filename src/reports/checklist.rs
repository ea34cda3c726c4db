// src/reports/checklist.rs
//
// Letter-portrait punch list of incomplete properties, grouped
// status -> state -> county, each followed by a three-column checkbox grid
// of its missing field labels.

use crate::domain::record::AnalyzedProperty;
use crate::errors::ServerError;
use crate::format;
use crate::reports::pdf_table::{Column, PdfBuilder, LETTER_PORTRAIT};
use chrono::{DateTime, Utc};

const NAME_TRUNCATE: usize = 38;
const LABEL_TRUNCATE: usize = 18;

/// Renders the checklist over an already filtered and sorted row set
/// (status priority, then state, then county — the detail-view order).
pub fn checklist_pdf(
    rows: &[&AnalyzedProperty],
    generated: DateTime<Utc>,
) -> Result<Vec<u8>, ServerError> {
    let incomplete: Vec<&AnalyzedProperty> = rows
        .iter()
        .copied()
        .filter(|p| !p.derived.completeness.is_complete())
        .collect();

    let mut pdf = PdfBuilder::new("Missing Information Checklist", LETTER_PORTRAIT)?;

    pdf.text_line(16.0, true, "Missing Information Checklist");
    pdf.text_line(
        9.0,
        false,
        &format!(
            "Generated {} · {} of {} properties incomplete",
            generated.format("%Y-%m-%d %H:%M UTC"),
            incomplete.len(),
            rows.len()
        ),
    );
    pdf.rule();

    let grid_width = pdf.usable_width() / 3.0;
    let grid = [
        Column {
            width: grid_width,
            wrap: false,
        },
        Column {
            width: grid_width,
            wrap: false,
        },
        Column {
            width: grid_width,
            wrap: false,
        },
    ];

    let mut current_status: Option<&str> = None;
    let mut current_state: Option<&str> = None;
    let mut current_county: Option<&str> = None;

    for prop in incomplete {
        let status = prop.record.status_label();
        let state = prop.record.state_label();
        let county = prop.record.county.as_str();

        if current_status != Some(status) {
            pdf.gap(2.0);
            pdf.heading(13.0, status);
            current_status = Some(status);
            current_state = None;
            current_county = None;
        }
        if current_state != Some(state) {
            pdf.heading(11.0, state);
            current_state = Some(state);
            current_county = None;
        }
        if current_county != Some(county) {
            pdf.text_line(10.0, true, county);
            current_county = Some(county);
        }

        let name = if prop.record.display_name.is_empty() {
            prop.record.id.as_str()
        } else {
            prop.record.display_name.as_str()
        };
        pdf.gap(1.5);
        pdf.text_line(9.0, true, &format::truncate_ellipsis(name, NAME_TRUNCATE));

        let labels = prop.derived.completeness.missing();
        for chunk in labels.chunks(3) {
            let cells: Vec<String> = chunk
                .iter()
                .map(|label| format!("[ ] {}", format::truncate_ellipsis(label, LABEL_TRUNCATE)))
                .collect();
            let mut cell_refs: Vec<&str> = cells.iter().map(String::as_str).collect();
            while cell_refs.len() < 3 {
                cell_refs.push("");
            }
            pdf.table_row(&grid, &cell_refs, 8.5, false);
        }
    }

    pdf.finish()
}
