// src/domain/aggregate.rs
//
// Read-only, presentation-facing rollups over the analyzed portfolio.
// Recomputed on every view request; the table is spreadsheet-scale.

use crate::domain::record::{status_rank, AnalyzedProperty};

/// Flat totals for the dashboard's metric header row.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub properties: usize,
    pub total_value: f64,
    pub total_cost_basis: f64,
    pub total_margin: f64,
    pub total_acres: f64,
    pub complete: usize,
}

/// Aggregates shared by every grouping level.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub count: usize,
    pub total_value: f64,
    pub total_cost_basis: f64,
    pub total_margin: f64,
    pub total_acres: f64,
    /// Mean over records that have a purchase date; `None` when none do.
    pub avg_days_held: Option<f64>,
    pub avg_price_reductions: f64,
    pub avg_price_per_acre: f64,
    pub complete: usize,
}

#[derive(Debug)]
pub struct CountyGroup {
    pub county: String,
    pub stats: GroupStats,
}

#[derive(Debug)]
pub struct StateGroup {
    pub state: String,
    pub stats: GroupStats,
    pub counties: Vec<CountyGroup>,
}

#[derive(Debug)]
pub struct StatusGroup {
    pub status: String,
    pub stats: GroupStats,
    pub states: Vec<StateGroup>,
}

#[derive(Debug)]
pub struct PortfolioBreakdown {
    pub summary: PortfolioSummary,
    pub statuses: Vec<StatusGroup>,
}

/// Status/state/county filter selection for the detail view and the report
/// routes. Each render is a pure function of (portfolio, filter).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewFilter {
    pub status: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
}

impl ViewFilter {
    pub fn matches(&self, prop: &AnalyzedProperty) -> bool {
        if let Some(status) = &self.status {
            if prop.record.status_label() != status {
                return false;
            }
        }
        if let Some(state) = &self.state {
            if prop.record.state_label() != state {
                return false;
            }
        }
        if let Some(county) = &self.county {
            if &prop.record.county != county {
                return false;
            }
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.state.is_none() && self.county.is_none()
    }
}

impl GroupStats {
    pub fn from_rows(rows: &[&AnalyzedProperty]) -> Self {
        let count = rows.len();
        let total_value: f64 = rows
            .iter()
            .map(|p| p.record.asking_price.unwrap_or(0.0))
            .sum();
        let total_cost_basis: f64 = rows
            .iter()
            .map(|p| p.record.cost_basis.unwrap_or(0.0))
            .sum();
        let total_margin: f64 = rows.iter().map(|p| p.derived.current_margin).sum();
        let total_acres: f64 = rows
            .iter()
            .map(|p| p.record.surveyed_acres.unwrap_or(0.0))
            .sum();

        // Day counts are nullable; means skip the nulls entirely.
        let held: Vec<i64> = rows.iter().filter_map(|p| p.derived.days_held).collect();
        let avg_days_held = if held.is_empty() {
            None
        } else {
            Some(held.iter().sum::<i64>() as f64 / held.len() as f64)
        };

        let avg_price_reductions = if count == 0 {
            0.0
        } else {
            rows.iter()
                .map(|p| p.derived.price_reductions as f64)
                .sum::<f64>()
                / count as f64
        };
        let avg_price_per_acre = if count == 0 {
            0.0
        } else {
            rows.iter().map(|p| p.derived.price_per_acre).sum::<f64>() / count as f64
        };

        let complete = rows
            .iter()
            .filter(|p| p.derived.completeness.is_complete())
            .count();

        GroupStats {
            count,
            total_value,
            total_cost_basis,
            total_margin,
            total_acres,
            avg_days_held,
            avg_price_reductions,
            avg_price_per_acre,
            complete,
        }
    }
}

/// Groups rows by a key, preserving first-encounter order of the keys.
fn group_preserving_order<'a, K, F>(
    rows: &[&'a AnalyzedProperty],
    key: F,
) -> Vec<(K, Vec<&'a AnalyzedProperty>)>
where
    K: PartialEq,
    F: Fn(&AnalyzedProperty) -> K,
{
    let mut groups: Vec<(K, Vec<&AnalyzedProperty>)> = Vec::new();
    for &row in rows {
        let k = key(row);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(row),
            None => groups.push((k, vec![row])),
        }
    }
    groups
}

pub fn summarize(props: &[AnalyzedProperty]) -> PortfolioSummary {
    let rows: Vec<&AnalyzedProperty> = props.iter().collect();
    let stats = GroupStats::from_rows(&rows);
    PortfolioSummary {
        properties: stats.count,
        total_value: stats.total_value,
        total_cost_basis: stats.total_cost_basis,
        total_margin: stats.total_margin,
        total_acres: stats.total_acres,
        complete: stats.complete,
    }
}

/// Builds the status -> state -> county tree. Known statuses come first in
/// the fixed priority order; anything else appends after, in the order it
/// was first encountered. States and counties sort alphabetically.
pub fn breakdown(props: &[AnalyzedProperty]) -> PortfolioBreakdown {
    let rows: Vec<&AnalyzedProperty> = props.iter().collect();

    let mut status_groups = group_preserving_order(&rows, |p| p.record.status_label().to_string());
    // Stable sort: unknown statuses share the max rank and keep their
    // encounter order.
    status_groups.sort_by_key(|(status, _)| status_rank(status).unwrap_or(usize::MAX));

    let statuses = status_groups
        .into_iter()
        .map(|(status, members)| {
            let mut state_groups =
                group_preserving_order(&members, |p| p.record.state_label().to_string());
            state_groups.sort_by(|(a, _), (b, _)| a.cmp(b));

            let states = state_groups
                .into_iter()
                .map(|(state, state_members)| {
                    let mut county_groups =
                        group_preserving_order(&state_members, |p| p.record.county.clone());
                    county_groups.sort_by(|(a, _), (b, _)| a.cmp(b));

                    let counties = county_groups
                        .into_iter()
                        .map(|(county, county_members)| CountyGroup {
                            county,
                            stats: GroupStats::from_rows(&county_members),
                        })
                        .collect();

                    StateGroup {
                        state,
                        stats: GroupStats::from_rows(&state_members),
                        counties,
                    }
                })
                .collect();

            StatusGroup {
                status,
                stats: GroupStats::from_rows(&members),
                states,
            }
        })
        .collect();

    PortfolioBreakdown {
        summary: summarize(props),
        statuses,
    }
}

/// Distribution of properties by state, largest count first, for the
/// dashboard's state chart. Ties keep first-encounter order.
pub fn count_by_state(props: &[AnalyzedProperty]) -> Vec<(String, usize)> {
    let rows: Vec<&AnalyzedProperty> = props.iter().collect();
    let mut counts: Vec<(String, usize)> =
        group_preserving_order(&rows, |p| p.record.state_label().to_string())
            .into_iter()
            .map(|(state, members)| (state, members.len()))
            .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Applies a filter and the default detail-table sort: status priority,
/// then state, then county. Ties keep upload order.
pub fn filter_and_sort<'a>(
    props: &'a [AnalyzedProperty],
    filter: &ViewFilter,
) -> Vec<&'a AnalyzedProperty> {
    let mut rows: Vec<&AnalyzedProperty> = props.iter().filter(|p| filter.matches(p)).collect();
    rows.sort_by(|a, b| {
        let ka = (
            status_rank(a.record.status_label()).unwrap_or(usize::MAX),
            a.record.state_label(),
            a.record.county.as_str(),
        );
        let kb = (
            status_rank(b.record.status_label()).unwrap_or(usize::MAX),
            b.record.state_label(),
            b.record.county.as_str(),
        );
        ka.cmp(&kb)
    });
    rows
}
