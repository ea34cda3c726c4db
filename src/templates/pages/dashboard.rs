use crate::domain::aggregate::{GroupStats, PortfolioBreakdown, PortfolioSummary, StateGroup};
use crate::format;
use crate::templates::{bar_row, card, desktop_layout, metric};
use maud::{html, Markup, PreEscaped};

pub struct DashboardVm {
    pub summary: PortfolioSummary,
    pub tree: PortfolioBreakdown,
    pub state_counts: Vec<(String, usize)>,
    pub uploaded_at: String,
    pub skipped_rows: usize,
    pub enrichment_enabled: bool,
}

const ENRICH_SCRIPT: &str = r#"
document.getElementById('enrich-form').addEventListener('submit', function (ev) {
    ev.preventDefault();
    var message = document.getElementById('enrich-message');
    message.textContent = 'Looking up leads record by record, this can take a while...';
    message.className = '';
    fetch('/enrich', { method: 'POST' }).then(function (resp) {
        return resp.text().then(function (text) {
            message.textContent = text;
            message.className = resp.ok ? '' : 'inline-message';
        });
    }).catch(function () {
        message.textContent = 'Enrichment failed: could not reach the server.';
        message.className = 'inline-message';
    });
});
"#;

fn avg_days(stats: &GroupStats) -> String {
    match stats.avg_days_held {
        Some(d) => format!("{d:.0}"),
        None => format::NA.to_string(),
    }
}

fn margin_pct(stats: &GroupStats) -> String {
    if stats.total_value > 0.0 {
        format::percent(stats.total_margin / stats.total_value * 100.0)
    } else {
        format::NA.to_string()
    }
}

fn county_table(state: &StateGroup) -> Markup {
    html! {
        p style="margin-bottom: 0.25rem;" { strong { (state.state) " Counties:" } }
        table class="data" {
            thead {
                tr {
                    th { "County" }
                    th { "Properties" }
                    th { "Total Value" }
                    th { "Avg Days Held" }
                    th { "Total Acres" }
                    th { "Margin %" }
                    th { "Complete" }
                }
            }
            tbody {
                @for county in &state.counties {
                    tr {
                        td { (county.county) }
                        td { (county.stats.count) }
                        td { (format::currency(county.stats.total_value)) }
                        td { (avg_days(&county.stats)) }
                        td { (format::acres(county.stats.total_acres)) }
                        td { (margin_pct(&county.stats)) }
                        td { (county.stats.complete) "/" (county.stats.count) }
                    }
                }
            }
        }
    }
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    let status_counts: Vec<(&str, usize)> = vm
        .tree
        .statuses
        .iter()
        .map(|g| (g.status.as_str(), g.stats.count))
        .collect();
    let status_max = status_counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let state_max = vm.state_counts.iter().map(|(_, c)| *c).max().unwrap_or(0);

    desktop_layout(
        "Dashboard",
        html! {
            main class="container" {
                h1 { "Portfolio Dashboard" }
                p {
                    "Hierarchical analysis: status → state → county. Loaded "
                    (vm.uploaded_at)
                    @if vm.skipped_rows > 0 {
                        " (" (vm.skipped_rows) " rows skipped at ingest)"
                    }
                    "."
                }

                div class="metric-row" {
                    (metric("Total Properties", &vm.summary.properties.to_string()))
                    (metric("Total Portfolio Value", &format::currency(vm.summary.total_value)))
                    (metric("Total Cost Basis", &format::currency(vm.summary.total_cost_basis)))
                    (metric("Total Portfolio Margin", &format::currency(vm.summary.total_margin)))
                    (metric("Complete Records", &format!("{}/{}", vm.summary.complete, vm.summary.properties)))
                }

                (card("Downloads", html! {
                    ul {
                        li { a href="/reports/checklist.pdf" { "Missing Information Checklist (PDF)" } }
                        li { a href="/reports/inventory.pdf" { "Inventory Report (PDF)" } }
                        li { a href="/export/properties.xlsx" { "Derived Table (XLSX)" } }
                    }
                    @if vm.enrichment_enabled {
                        form id="enrich-form" style="margin-top: 0.5rem;" {
                            button type="submit" style="padding: 6px 14px; cursor: pointer;" {
                                "Run CRM Lead Enrichment"
                            }
                        }
                        p id="enrich-message" {}
                        script { (PreEscaped(ENRICH_SCRIPT)) }
                    } @else {
                        p style="color: #6b7280; font-size: 0.85em;" {
                            "CRM lead enrichment is disabled (no API key configured)."
                        }
                    }
                }))

                (card("By Opportunity Status", html! {
                    table class="data" {
                        thead {
                            tr {
                                th { "Status" }
                                th { "Properties" }
                                th { "Total Value" }
                                th { "Avg Days Held" }
                                th { "Avg Reductions" }
                                th { "Total Margin" }
                                th { "Complete" }
                            }
                        }
                        tbody {
                            @for group in &vm.tree.statuses {
                                tr {
                                    td { (group.status) }
                                    td { (group.stats.count) }
                                    td { (format::currency(group.stats.total_value)) }
                                    td { (avg_days(&group.stats)) }
                                    td { (format!("{:.1}", group.stats.avg_price_reductions)) }
                                    td { (format::currency(group.stats.total_margin)) }
                                    td { (group.stats.complete) "/" (group.stats.count) }
                                }
                            }
                        }
                    }
                }))

                @for group in &vm.tree.statuses {
                    details {
                        summary { (group.status) " - Detailed Breakdown" }
                        div class="card" {
                            h4 { "States within " (group.status) }
                            table class="data" {
                                thead {
                                    tr {
                                        th { "State" }
                                        th { "Properties" }
                                        th { "Total Value" }
                                        th { "Avg Days Held" }
                                        th { "Total Acres" }
                                        th { "Avg Price/Acre" }
                                    }
                                }
                                tbody {
                                    @for state in &group.states {
                                        tr {
                                            td { (state.state) }
                                            td { (state.stats.count) }
                                            td { (format::currency(state.stats.total_value)) }
                                            td { (avg_days(&state.stats)) }
                                            td { (format::acres(state.stats.total_acres)) }
                                            td { (format::currency(state.stats.avg_price_per_acre)) }
                                        }
                                    }
                                }
                            }
                            @for state in &group.states {
                                (county_table(state))
                            }
                        }
                    }
                }

                div style="display: flex; gap: 1.5rem; flex-wrap: wrap;" {
                    div style="flex: 1 1 400px;" {
                        (card("Properties by Status", html! {
                            @for (label, count) in &status_counts {
                                (bar_row(label, *count, status_max))
                            }
                        }))
                    }
                    div style="flex: 1 1 400px;" {
                        (card("Properties by State", html! {
                            @for (label, count) in &vm.state_counts {
                                (bar_row(label, *count, state_max))
                            }
                        }))
                    }
                }
            }
        },
    )
}
