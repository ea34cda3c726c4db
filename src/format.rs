// src/format.rs
//
// Display formatting shared by the HTML tables and the PDF/XLSX exports.

use chrono::NaiveDate;

/// "N/A" is the printed form of "not applicable": absent or non-positive
/// numeric fields render as it so reports can distinguish unset data from a
/// genuine zero.
pub const NA: &str = "N/A";

fn thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    let first_group = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - first_group) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Whole-dollar currency: "$1,234,568". Negatives keep the sign ahead of
/// the dollar sign, matching the CRM's own export format.
pub fn currency(value: f64) -> String {
    let rounded = value.round() as i64;
    if rounded < 0 {
        format!("-${}", thousands(-rounded))
    } else {
        format!("${}", thousands(rounded))
    }
}

/// Currency for report cells: non-positive renders as N/A.
pub fn currency_or_na(value: f64) -> String {
    if value > 0.0 {
        currency(value)
    } else {
        NA.to_string()
    }
}

/// Percentage with one decimal: "33.3%". Non-positive renders as N/A in
/// report cells via `percent_or_na`.
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn percent_or_na(value: f64) -> String {
    if value > 0.0 {
        percent(value)
    } else {
        NA.to_string()
    }
}

pub fn acres(value: f64) -> String {
    format!("{value:.1}")
}

pub fn acres_or_na(value: Option<f64>) -> String {
    match value {
        Some(v) if v > 0.0 => acres(v),
        _ => NA.to_string(),
    }
}

pub fn days(value: Option<i64>) -> String {
    match value {
        Some(d) => d.to_string(),
        None => NA.to_string(),
    }
}

pub fn date(value: Option<NaiveDate>) -> String {
    match value {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => NA.to_string(),
    }
}

/// Hard truncation with an ellipsis, used where a report cell cannot wrap.
pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();
    if count <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Greedy word wrap for report cells that spread long names over extra
/// lines instead of truncating. Words longer than the width are hard-split.
pub fn wrap_text(s: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return vec![s.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in s.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(max_chars).collect();
            let tail: String = word.chars().skip(max_chars).collect();
            lines.push(head);
            word = tail;
        }
        if word.is_empty() {
            continue;
        }
        if current.is_empty() {
            current = word;
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
