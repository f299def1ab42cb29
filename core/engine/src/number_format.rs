//! FILENAME: core/engine/src/number_format.rs
//! PURPOSE: Value formatting for cells, axis ticks and tooltips.
//! CONTEXT: This is called for every rendered cell, tick and tooltip, so it
//! never fails: any input shape produces some display string.

use chrono::NaiveDate;

use crate::pill::{Aggregation, ValueFormat};
use crate::value::FieldValue;

/// Placeholder shown for missing values.
pub const MISSING_VALUE: &str = "-";

/// Default upper bound on fraction digits.
const DEFAULT_MAX_FRACTION_DIGITS: u8 = 2;

/// Format a value for display using the pill's format and aggregation.
pub fn format_value(
    value: &FieldValue,
    format: Option<&ValueFormat>,
    aggregation: Option<Aggregation>,
) -> String {
    if value.is_missing() {
        return MISSING_VALUE.to_string();
    }

    match value {
        FieldValue::Date(date) => return format_locale_date(*date),
        FieldValue::Object(obj) => return obj.to_string(),
        _ => {}
    }

    let number = value.as_f64();

    if aggregation == Some(Aggregation::PercentOfTotal) {
        return match number {
            Some(n) => format_percentage(n, 2),
            None => MISSING_VALUE.to_string(),
        };
    }

    match number {
        Some(n) => format_number(n, format),
        None => value.to_string(),
    }
}

/// Shorthand for formatting a bare number.
pub fn format_f64(value: f64, format: Option<&ValueFormat>, aggregation: Option<Aggregation>) -> String {
    format_value(&FieldValue::Number(value), format, aggregation)
}

/// Format a number with thousands separators, wrapped in prefix/suffix.
pub fn format_number(value: f64, format: Option<&ValueFormat>) -> String {
    let default_format = ValueFormat::default();
    let format = format.unwrap_or(&default_format);

    let body = if !value.is_finite() {
        if value.is_sign_negative() { "-∞".to_string() } else { "∞".to_string() }
    } else if let Some(places) = format.decimal_places {
        add_thousands_separator(&format_decimal(value, places))
    } else {
        let max = format
            .maximum_fraction_digits
            .unwrap_or(DEFAULT_MAX_FRACTION_DIGITS);
        add_thousands_separator(&trim_fraction(&format_decimal(value, max)))
    };

    format!(
        "{}{}{}",
        format.prefix.as_deref().unwrap_or(""),
        body,
        format.suffix.as_deref().unwrap_or("")
    )
}

/// Abbreviated form for axis ticks (1.5K, 2M, 3.2B).
pub fn format_compact(value: f64) -> String {
    let abs_value = value.abs();
    let (scaled, unit) = if abs_value >= 1e9 {
        (value / 1e9, "B")
    } else if abs_value >= 1e6 {
        (value / 1e6, "M")
    } else if abs_value >= 1e3 {
        (value / 1e3, "K")
    } else {
        return format_number(value, None);
    };
    format!("{}{}", trim_fraction(&format_decimal(scaled, 1)), unit)
}

/// Locale (en-US) date string: month/day/year without padding.
fn format_locale_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Format a number as percentage.
fn format_percentage(value: f64, decimal_places: u8) -> String {
    let percentage = value * 100.0;
    format!("{:.prec$}%", percentage, prec = decimal_places as usize)
}

/// Fixed number of fraction digits, no grouping.
fn format_decimal(value: f64, decimal_places: u8) -> String {
    let rounded = format!("{:.prec$}", value, prec = decimal_places as usize);
    // "-0.00" reads as noise in a dashboard
    if rounded.starts_with('-') && rounded[1..].chars().all(|c| c == '0' || c == '.') {
        rounded[1..].to_string()
    } else {
        rounded
    }
}

/// Drop trailing fraction zeros (and the dot if nothing remains).
fn trim_fraction(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

/// Add thousands separators to a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (s, None),
    };

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    let len = digits.len();

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if negative {
        result = format!("-{}", result);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}
