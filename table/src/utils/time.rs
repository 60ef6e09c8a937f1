//! Time utility functions

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;

/// Naive datetime layouts accepted in record values (interpreted as UTC)
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a date-like string to DateTime<Utc>.
///
/// Accepts RFC 3339 timestamps, naive datetimes (taken as UTC) and plain
/// `YYYY-MM-DD` dates (midnight UTC). Returns `None` for anything else.
pub fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a record value as a point in time.
///
/// Strings go through [`parse_date_str`]; numbers are milliseconds since the
/// Unix epoch. Absent, `null`, booleans, arrays and objects do not parse.
pub fn parse_date_value(value: Option<&JsonValue>) -> Option<DateTime<Utc>> {
    match value? {
        JsonValue::String(s) => parse_date_str(s),
        JsonValue::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .and_then(|millis| DateTime::from_timestamp_millis(millis as i64)),
        _ => None,
    }
}

/// Format a timestamp for table display (`YYYY-MM-DD HH:MM`)
pub fn format_display(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Returns true when the string is a bare `YYYY-MM-DD` date
pub fn is_date_only(s: &str) -> bool {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").is_ok()
}
