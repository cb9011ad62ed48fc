//! FILENAME: core/drill-engine/src/parse.rs
//! Currency, date and device-identifier parsing.
//!
//! All of these are total functions: malformed input degrades to a zero or
//! `None` and never propagates an error, so one dirty export row cannot
//! take the dashboard down.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields::{Field, Record};

/// Matches a leading D/M/Y date like "03/11/2024".
static DMY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})").unwrap());

// ============================================================================
// CURRENCY
// ============================================================================

/// Parses a currency-ish string, tolerating symbols and separators.
/// "$1,234.50" -> 1234.5. Empty or non-numeric input yields 0.0.
pub fn parse_currency(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Formats a cost as "$1,234.5": thousands separators, at most two
/// fraction digits, trailing zeros trimmed.
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if negative && cents > 0 {
        out.push('-');
    }
    out.push('$');
    out.push_str(&grouped);
    if frac != 0 {
        if frac % 10 == 0 {
            out.push_str(&format!(".{}", frac / 10));
        } else {
            out.push_str(&format!(".{:02}", frac));
        }
    }
    out
}

// ============================================================================
// DATES
// ============================================================================

/// Parses a process date. D/M/Y first (the common export shape), then ISO
/// "YYYY-MM-DD", then the date prefix of an ISO timestamp.
pub fn parse_date_dmy(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(caps) = DMY_PATTERN.captures(raw) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

// ============================================================================
// DEVICES
// ============================================================================

/// 1 when the record carries a device identifier (IMEI under any alias),
/// 0 otherwise.
pub fn count_device(record: &Record) -> u32 {
    if Field::Imei.resolve(record).trim().is_empty() {
        0
    } else {
        1
    }
}
