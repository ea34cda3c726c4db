use maud::{html, Markup};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h3 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// One dashboard metric tile.
pub fn metric(label: &str, value: &str) -> Markup {
    html! {
        div class="metric" {
            div class="label" { (label) }
            div class="value" { (value) }
        }
    }
}

/// One row of a horizontal bar chart: label, bar scaled against the
/// largest count in the series, and the count itself.
pub fn bar_row(label: &str, count: usize, max: usize) -> Markup {
    let pct = if max == 0 {
        0.0
    } else {
        count as f64 / max as f64 * 100.0
    };
    html! {
        div style="display: flex; align-items: center; gap: 8px; margin-bottom: 6px;" {
            span style="flex: 0 0 140px; font-size: 0.85em; text-align: right;" { (label) }
            div class="bar-track" style="flex: 1;" {
                div class="bar-fill" style=(format!("width: {pct:.0}%;")) {}
            }
            span style="flex: 0 0 40px; font-size: 0.85em;" { (count) }
        }
    }
}
