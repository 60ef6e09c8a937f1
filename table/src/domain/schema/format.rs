//! Plain-text rendering of field values

use serde_json::Value as JsonValue;

use crate::utils::json::to_plain_string;
use crate::utils::time::{format_display, is_date_only, parse_date_str};

use super::annotation::{ColumnTypeInfo, ColumnVariant};

/// Placeholder for missing values
pub const EMPTY_PLACEHOLDER: &str = "—";

/// Keys tried, in order, to name a related record
const RELATION_LABEL_KEYS: &[&str] = &["repr", "name", "title", "id"];

fn relation_label(value: &JsonValue) -> String {
    if let JsonValue::Object(map) = value {
        for key in RELATION_LABEL_KEYS {
            match map.get(*key) {
                Some(JsonValue::Null) | None => continue,
                Some(JsonValue::String(s)) if s.is_empty() => continue,
                Some(v) => return to_plain_string(v),
            }
        }
    }
    to_plain_string(value)
}

/// Render a value for display according to its column type
pub fn format_field_value(value: Option<&JsonValue>, info: &ColumnTypeInfo) -> String {
    let value = match value {
        None | Some(JsonValue::Null) => return EMPTY_PLACEHOLDER.to_string(),
        Some(v) => v,
    };

    if let JsonValue::Array(items) = value {
        let rendered: Vec<String> = if info.is_relation {
            items.iter().map(relation_label).collect()
        } else {
            items.iter().map(to_plain_string).collect()
        };
        return rendered.join(", ");
    }

    if info.is_relation {
        return relation_label(value);
    }

    match (info.variant, value) {
        (ColumnVariant::Boolean, JsonValue::Bool(b)) => {
            let label = if *b { "Yes" } else { "No" };
            label.to_string()
        }
        (ColumnVariant::Date, JsonValue::String(s)) => match parse_date_str(s) {
            Some(_) if is_date_only(s) => s.trim().to_string(),
            Some(dt) => format_display(&dt),
            None => s.clone(),
        },
        _ => to_plain_string(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{FieldSchema, parse_field_annotation};
    use serde_json::json;

    fn info(annotation: &str) -> ColumnTypeInfo {
        parse_field_annotation(&FieldSchema {
            annotation: annotation.into(),
            ..FieldSchema::default()
        })
    }

    #[test]
    fn test_missing_values_render_placeholder() {
        assert_eq!(format_field_value(None, &info("<class 'str'>")), "—");
        assert_eq!(format_field_value(Some(&json!(null)), &info("<class 'str'>")), "—");
    }

    #[test]
    fn test_relation_arrays_use_repr_then_fallbacks() {
        let value = json!([
            {"id": 1, "repr": "DC01"},
            {"id": 2, "name": "WEB01"},
            {"id": 3},
            "raw"
        ]);
        assert_eq!(
            format_field_value(Some(&value), &info("set[Entity(host)]")),
            "DC01, WEB01, 3, raw"
        );
    }

    #[test]
    fn test_single_relation() {
        let value = json!({"id": 9, "repr": "alice@corp"});
        assert_eq!(format_field_value(Some(&value), &info("Entity(user)")), "alice@corp");
    }

    #[test]
    fn test_primitive_array() {
        let value = json!([22, 80, 443]);
        assert_eq!(format_field_value(Some(&value), &info("list[int]")), "22, 80, 443");
    }

    #[test]
    fn test_booleans_and_dates() {
        assert_eq!(format_field_value(Some(&json!(true)), &info("<class 'bool'>")), "Yes");
        assert_eq!(format_field_value(Some(&json!(false)), &info("<class 'bool'>")), "No");
        assert_eq!(
            format_field_value(Some(&json!("2024-03-05T07:08:09Z")), &info("<class 'datetime.datetime'>")),
            "2024-03-05 07:08"
        );
        assert_eq!(
            format_field_value(Some(&json!("2024-03-05")), &info("<class 'datetime.date'>")),
            "2024-03-05"
        );
        assert_eq!(
            format_field_value(Some(&json!("unknown")), &info("<class 'datetime.date'>")),
            "unknown"
        );
    }

    #[test]
    fn test_numbers_render_plainly() {
        assert_eq!(format_field_value(Some(&json!(3.0)), &info("<class 'float'>")), "3");
        assert_eq!(format_field_value(Some(&json!(0)), &info("<class 'int'>")), "0");
    }
}
