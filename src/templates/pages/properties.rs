use crate::crm::leads::LookupStatus;
use crate::domain::aggregate::ViewFilter;
use crate::domain::record::AnalyzedProperty;
use crate::format;
use crate::templates::{card, desktop_layout};
use maud::{html, Markup};

pub struct PropertiesVm {
    /// Already filtered and sorted (status priority, state, county).
    pub rows: Vec<AnalyzedProperty>,
    pub filter: ViewFilter,
    pub statuses: Vec<String>,
    pub states: Vec<String>,
    pub counties: Vec<String>,
    pub any_leads: bool,
}

fn url_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => out.push(c),
            ' ' => out.push_str("%20"),
            _ => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    out
}

/// Query-string suffix carrying the current filter, so the download links
/// export exactly what the table shows.
pub fn filter_query(filter: &ViewFilter) -> String {
    let mut parts = Vec::new();
    if let Some(status) = &filter.status {
        parts.push(format!("status={}", url_encode(status)));
    }
    if let Some(state) = &filter.state {
        parts.push(format!("state={}", url_encode(state)));
    }
    if let Some(county) = &filter.county {
        parts.push(format!("county={}", url_encode(county)));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}

fn leads_cell(leads: &Option<crate::crm::leads::LeadLookup>) -> Markup {
    match leads {
        Some(lookup) => match &lookup.status {
            LookupStatus::Error(_) => html! { span style="color: #dc2626;" { "error" } },
            _ => html! { (lookup.count) },
        },
        None => html! { "—" },
    }
}

fn filter_select(name: &str, label: &str, options: &[String], selected: &Option<String>) -> Markup {
    html! {
        label style="display: flex; flex-direction: column; font-size: 0.85em; gap: 2px;" {
            (label)
            select name=(name) style="padding: 6px; min-width: 140px;" {
                option value="" selected[selected.is_none()] { "All" }
                @for option in options {
                    option value=(option) selected[selected.as_deref() == Some(option.as_str())] {
                        (option)
                    }
                }
            }
        }
    }
}

pub fn properties_page(vm: &PropertiesVm) -> Markup {
    let query = filter_query(&vm.filter);

    desktop_layout(
        "Properties",
        html! {
            main class="container" {
                h1 { "Properties" }

                (card("Filters", html! {
                    form action="/properties" method="get" style="display: flex; gap: 14px; align-items: flex-end; flex-wrap: wrap;" {
                        (filter_select("status", "Status", &vm.statuses, &vm.filter.status))
                        (filter_select("state", "State", &vm.states, &vm.filter.state))
                        (filter_select("county", "County", &vm.counties, &vm.filter.county))
                        button type="submit" style="padding: 7px 16px; cursor: pointer;" { "Apply" }
                        @if !vm.filter.is_empty() {
                            a href="/properties" { "Clear" }
                        }
                    }
                    p style="font-size: 0.85em; margin-bottom: 0;" {
                        "Export this view: "
                        a href=(format!("/reports/checklist.pdf{query}")) { "Checklist PDF" }
                        " · "
                        a href=(format!("/reports/inventory.pdf{query}")) { "Inventory PDF" }
                        " · "
                        a href=(format!("/export/properties.xlsx{query}")) { "XLSX" }
                    }
                }))

                p { (vm.rows.len()) " properties" }

                div style="overflow-x: auto;" {
                    table class="data" {
                        thead {
                            tr {
                                th { "Property" }
                                th { "Status" }
                                th { "Type" }
                                th { "State" }
                                th { "County" }
                                th { "Acres" }
                                th { "Cost Basis" }
                                th { "Current Price" }
                                th { "Margin" }
                                th { "Margin %" }
                                th { "Reductions" }
                                th { "Days Held" }
                                th { "Completeness" }
                                @if vm.any_leads {
                                    th { "Leads" }
                                }
                            }
                        }
                        tbody {
                            @for prop in &vm.rows {
                                tr {
                                    td {
                                        @if prop.record.display_name.is_empty() {
                                            (prop.record.id)
                                        } @else {
                                            (prop.record.display_name)
                                        }
                                    }
                                    td { (prop.record.status_label()) }
                                    td { (prop.record.listing_type().label()) }
                                    td { (prop.record.state_label()) }
                                    td { (prop.record.county) }
                                    td { (format::acres_or_na(prop.record.surveyed_acres)) }
                                    td { (format::currency_or_na(prop.record.cost_basis.unwrap_or(0.0))) }
                                    td { (format::currency_or_na(prop.record.asking_price.unwrap_or(0.0))) }
                                    td { (format::currency(prop.derived.current_margin)) }
                                    td { (format::percent(prop.derived.current_margin_pct)) }
                                    td { (prop.derived.price_reductions) }
                                    td { (format::days(prop.derived.days_held)) }
                                    td {
                                        @if prop.derived.completeness.is_complete() {
                                            span style="color: #10b981;" { "Complete" }
                                        } @else {
                                            span style="color: #dc2626;" {
                                                (prop.derived.completeness.label())
                                            }
                                        }
                                    }
                                    @if vm.any_leads {
                                        td { (leads_cell(&prop.leads)) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_query_encodes_spaces() {
        let filter = ViewFilter {
            status: Some("Under Contract".to_string()),
            state: Some("TX".to_string()),
            county: None,
        };
        assert_eq!(filter_query(&filter), "?status=Under%20Contract&state=TX");
        assert_eq!(filter_query(&ViewFilter::default()), "");
    }
}
