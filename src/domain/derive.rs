// src/domain/derive.rs
//
// The derivation engine: every metric here is a pure, row-wise function of
// one raw record and the processing instant.

use crate::domain::completeness;
use crate::domain::record::{AnalyzedProperty, DerivedMetrics, PropertyRecord};
use chrono::{NaiveDate, Utc};

/// Estimates how many times a listing's price has been reduced, from the
/// trailing digit of the current price alone. Sellers end round-numbered
/// prices on successive integers counting down from 9, so a price ending in
/// 9 has had no reductions, 8 one, 7 two, ... 0 nine.
///
/// This is the stated business rule, reproduced as-is. It has no grounding
/// in actual reduction history and misreports for any price that does not
/// follow the convention.
pub fn price_reductions(price: Option<f64>) -> u32 {
    let price = match price {
        Some(p) if p != 0.0 => p,
        _ => return 0,
    };

    // Only the final decimal digit of the truncated integer matters; the
    // same rule applies uniformly to negatives and prices below 10.
    let last_digit = ((price.trunc() as i64).unsigned_abs() % 10) as u32;
    (9 - last_digit) % 10
}

/// Whole days from the purchase date to `today`, or `None` when the anchor
/// date is missing/unparseable. Clamped to zero for future-dated purchases.
pub fn days_held(date_purchased: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    date_purchased.map(|d| (today - d).num_days().max(0))
}

/// Division with the uniform zero-denominator guard: downstream formats
/// every derived number as currency/percent text, and a NaN or infinity
/// would corrupt every sum and mean computed over the column.
fn guarded_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Computes all derived metrics for one record. `today` is the date of the
/// derivation pass; the day-count field is deliberately wall-clock-relative
/// and may differ between runs against the same data.
pub fn derive(record: &PropertyRecord, today: NaiveDate) -> DerivedMetrics {
    let asking = record.asking_price.unwrap_or(0.0);
    let cost = record.cost_basis.unwrap_or(0.0);
    let acres = record.surveyed_acres.unwrap_or(0.0);
    let original = record.original_listing_price.unwrap_or(0.0);

    let current_margin = asking - cost;

    DerivedMetrics {
        price_reductions: price_reductions(record.asking_price),
        days_held: days_held(record.date_purchased, today),
        current_margin,
        current_margin_pct: guarded_div(current_margin, asking) * 100.0,
        price_per_acre: guarded_div(asking, acres),
        cost_basis_per_acre: guarded_div(cost, acres),
        markup_percentage: guarded_div(asking - cost, cost) * 100.0,
        percent_of_initial_listing: guarded_div(asking, original) * 100.0,
        completeness: completeness::check(record),
    }
}

/// Runs the derivation pass over a freshly ingested portfolio.
pub fn analyze(records: Vec<PropertyRecord>) -> Vec<AnalyzedProperty> {
    let today = Utc::now().date_naive();
    records
        .into_iter()
        .map(|record| {
            let derived = derive(&record, today);
            AnalyzedProperty {
                record,
                derived,
                leads: None,
            }
        })
        .collect()
}
