//! JSON utility functions
//!
//! Record values arrive as loosely-typed JSON. These helpers give them the
//! coercions the table engine relies on: truthiness, string rendering and
//! numeric conversion. An absent field is passed as `None` and is distinct
//! from an explicit `null`.

use serde_json::{Number, Value as JsonValue};

/// Returns false for absent, `null`, `false`, `0` and `""`; true otherwise.
///
/// Arrays and objects are always truthy, even when empty.
pub fn is_truthy(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::Bool(b)) => *b,
        Some(JsonValue::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(JsonValue::String(s)) => !s.is_empty(),
        Some(JsonValue::Array(_)) | Some(JsonValue::Object(_)) => true,
    }
}

/// Render a number the way it is displayed to users: integral floats lose
/// their trailing `.0`.
pub fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Stringify a value.
///
/// `null` renders as `"null"`, arrays join their items with `,` (null items
/// render empty), relation objects render their `repr` and other objects
/// their compact JSON.
pub fn to_plain_string(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => number_to_string(n),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| match item {
                JsonValue::Null => String::new(),
                other => to_plain_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        JsonValue::Object(map) => match map.get("repr") {
            Some(JsonValue::String(repr)) => repr.clone(),
            _ => serde_json::to_string(value).unwrap_or_default(),
        },
    }
}

/// Stringify a value, collapsing falsy values to `""`.
pub fn to_display_string(value: Option<&JsonValue>) -> String {
    match value {
        Some(v) if is_truthy(Some(v)) => to_plain_string(v),
        _ => String::new(),
    }
}

/// Convert a value to a number.
///
/// Absent values, objects and unparsable strings yield `NaN`; `null`, `false`
/// and blank strings yield `0`. Single-item arrays convert their only item.
pub fn to_number(value: Option<&JsonValue>) -> f64 {
    match value {
        None => f64::NAN,
        Some(JsonValue::Null) => 0.0,
        Some(JsonValue::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(JsonValue::String(s)) => parse_numeric_str(s),
        Some(JsonValue::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [only] => to_number(Some(only)),
            _ => f64::NAN,
        },
        Some(JsonValue::Object(_)) => f64::NAN,
    }
}

fn parse_numeric_str(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts "inf"/"nan" spellings that users never mean as numbers
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => {
            f64::NAN
        }
        _ => trimmed.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// Identifier of a relation object (an object carrying an `id` key).
pub fn relation_id(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Object(map) => map.get("id").map(to_plain_string),
        _ => None,
    }
}
