// Parsing and formatting helpers.
//
// Count cells in the source CSV are sometimes exported with thousands
// separators or padding; everything here turns them into clean values so
// the rest of the code can work with plain integers.
use num_format::{Locale, ToFormattedString};

/// Parse a count cell into a non-negative integer.
///
/// - Trims whitespace and strips `,` thousands separators.
/// - Rejects empty cells, signs, fractions and anything non-numeric.
pub fn parse_count_safe(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<u64>().ok()
}

/// Trim an optional text cell, treating blanks as missing.
pub fn clean_text(s: Option<String>) -> Option<String> {
    let s = s?.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Format a floating-point value with fixed decimals and `,` grouping
/// (e.g. `1,234.57`).
pub fn format_number(n: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if n.is_sign_negative() && n != 0.0 {
        format!("-{res}")
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Render an optional percentage, `-` when undefined.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format_number(r, 2),
        None => "-".to_string(),
    }
}
