//! Filter parsing
//!
//! Decodes raw conditions into typed predicates, and parses filter documents
//! (JSON text) into a [`GlobalFilter`] with size and count limits.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::utils::json::{is_truthy, to_display_string, to_number, to_plain_string};
use crate::utils::time::parse_date_value;

use super::error::FilterError;
use super::types::{
    DateBound, DatetimeOp, EmptyOp, FilterCondition, FilterGroup, FilterLogic, FilterOperator,
    GlobalFilter, NumberOp, OptionsOp, Predicate, RawCondition, StringOp,
};

/// Maximum size of filter JSON in bytes (64KB)
pub const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of conditions allowed in one group
pub const MAX_CONDITIONS: usize = 50;

/// Filter document as written by users or stored by the editor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterDocument {
    #[serde(default)]
    pub conditions: Vec<RawCondition>,
    #[serde(default)]
    pub logic: FilterLogic,
}

/// Decode one raw condition.
///
/// Returns `None` when column or operator is empty; such conditions are
/// still being edited and take no part in filtering.
pub fn decode_condition(raw: &RawCondition) -> Option<FilterCondition> {
    if !raw.is_complete() {
        return None;
    }

    let operator = FilterOperator::parse(&raw.operator);
    let value = &raw.value;

    let predicate = match operator {
        FilterOperator::Contains => string_predicate(StringOp::Contains, value),
        FilterOperator::DoesNotContain => string_predicate(StringOp::DoesNotContain, value),
        FilterOperator::Is => string_predicate(StringOp::Is, value),
        FilterOperator::IsNot => string_predicate(StringOp::IsNot, value),
        FilterOperator::IsEmpty => Predicate::Empty {
            operator: EmptyOp::IsEmpty,
        },
        FilterOperator::IsNotEmpty => Predicate::Empty {
            operator: EmptyOp::IsNotEmpty,
        },
        FilterOperator::Equals => number_predicate(NumberOp::Eq, value),
        FilterOperator::NotEquals => number_predicate(NumberOp::Ne, value),
        FilterOperator::GreaterThan => number_predicate(NumberOp::Gt, value),
        FilterOperator::LessThan => number_predicate(NumberOp::Lt, value),
        FilterOperator::GreaterEqual => number_predicate(NumberOp::Gte, value),
        FilterOperator::LessEqual => number_predicate(NumberOp::Lte, value),
        FilterOperator::HasAnyOf => options_predicate(OptionsOp::AnyOf, value),
        FilterOperator::HasNoneOf => options_predicate(OptionsOp::NoneOf, value),
        FilterOperator::IsOn => datetime_predicate(DatetimeOp::On, value),
        FilterOperator::IsBefore => datetime_predicate(DatetimeOp::Before, value),
        FilterOperator::IsAfter => datetime_predicate(DatetimeOp::After, value),
        FilterOperator::IsBetween => Predicate::Between {
            value: decode_range(value),
        },
        FilterOperator::Unknown(name) => {
            tracing::warn!(column = %raw.column, operator = %name, "Unknown filter operator");
            Predicate::Unknown { operator: name }
        }
    };

    Some(FilterCondition {
        column: raw.column.clone(),
        predicate,
    })
}

fn string_predicate(operator: StringOp, value: &JsonValue) -> Predicate {
    Predicate::String {
        operator,
        value: to_display_string(Some(value)).to_lowercase(),
    }
}

/// Falsy operands other than a literal zero count as absent
fn number_predicate(operator: NumberOp, value: &JsonValue) -> Predicate {
    let is_zero = value.as_f64() == Some(0.0);
    let value = if is_truthy(Some(value)) || is_zero {
        Some(to_number(Some(value)))
    } else {
        None
    };
    Predicate::Number { operator, value }
}

/// Only a non-empty array is a usable set of options
fn options_predicate(operator: OptionsOp, value: &JsonValue) -> Predicate {
    let value = match value {
        JsonValue::Array(items) if !items.is_empty() => {
            Some(items.iter().map(to_plain_string).collect())
        }
        _ => None,
    };
    Predicate::Options { operator, value }
}

fn datetime_predicate(operator: DatetimeOp, value: &JsonValue) -> Predicate {
    let value = is_truthy(Some(value)).then(|| decode_date(value));
    Predicate::Datetime { operator, value }
}

fn decode_date(value: &JsonValue) -> DateBound {
    match parse_date_value(Some(value)) {
        Some(dt) => DateBound::Valid(dt),
        None => DateBound::Invalid(to_plain_string(value)),
    }
}

/// A range needs an object with both `start` and `end` set
fn decode_range(value: &JsonValue) -> Option<(DateBound, DateBound)> {
    let map = value.as_object()?;
    let start = map.get("start").filter(|v| is_truthy(Some(*v)))?;
    let end = map.get("end").filter(|v| is_truthy(Some(*v)))?;
    Some((decode_date(start), decode_date(end)))
}

/// Build a group from raw conditions, dropping incomplete ones.
///
/// Returns `None` when nothing is left to evaluate.
pub fn build_group(conditions: &[RawCondition], logic: FilterLogic) -> Option<FilterGroup> {
    let conditions: Vec<FilterCondition> =
        conditions.iter().filter_map(decode_condition).collect();
    if conditions.is_empty() {
        return None;
    }
    Some(FilterGroup { conditions, logic })
}

fn check_size(json_str: &str) -> Result<(), FilterError> {
    if json_str.len() > MAX_FILTER_JSON_SIZE {
        return Err(FilterError::TooLarge {
            max: MAX_FILTER_JSON_SIZE,
        });
    }
    Ok(())
}

fn check_count(document: &FilterDocument) -> Result<(), FilterError> {
    if document.conditions.len() > MAX_CONDITIONS {
        return Err(FilterError::TooManyConditions {
            max: MAX_CONDITIONS,
        });
    }
    Ok(())
}

fn group_from_document(document: FilterDocument) -> Result<Option<FilterGroup>, FilterError> {
    check_count(&document)?;
    Ok(build_group(&document.conditions, document.logic))
}

/// Parse a filter document without decoding its conditions.
///
/// Used to seed a filter editor; size and count limits still apply.
pub fn parse_filter_document(json_str: &str) -> Result<FilterDocument, FilterError> {
    check_size(json_str)?;
    let document: FilterDocument = serde_json::from_str(json_str)?;
    check_count(&document)?;
    Ok(document)
}

/// Parse a condition group document
/// (`{"conditions": [...], "logic": "and" | "or"}`).
///
/// Returns `Ok(None)` when no complete condition remains.
pub fn parse_filter_group(json_str: &str) -> Result<Option<FilterGroup>, FilterError> {
    let document = parse_filter_document(json_str)?;
    Ok(build_group(&document.conditions, document.logic))
}

/// Parse a global filter document: either a JSON string (plain search) or a
/// condition group object. `null` and inert filters yield `Ok(None)`.
pub fn parse_global_filter(json_str: &str) -> Result<Option<GlobalFilter>, FilterError> {
    check_size(json_str)?;
    let value: JsonValue = serde_json::from_str(json_str)?;
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(search) if search.is_empty() => Ok(None),
        JsonValue::String(search) => Ok(Some(GlobalFilter::Search(search))),
        JsonValue::Object(_) => {
            let document: FilterDocument = serde_json::from_value(value)?;
            Ok(group_from_document(document)?.map(GlobalFilter::Group))
        }
        _ => Err(FilterError::InvalidShape),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(column: &str, operator: &str, value: JsonValue) -> Predicate {
        decode_condition(&RawCondition::new(column, operator, value))
            .unwrap()
            .predicate
    }

    #[test]
    fn incomplete_conditions_are_dropped() {
        assert!(decode_condition(&RawCondition::new("", "is", json!("x"))).is_none());
        assert!(decode_condition(&RawCondition::new("name", "", json!("x"))).is_none());
    }

    #[test]
    fn string_needle_is_lowercased() {
        assert_eq!(
            decode("name", "contains", json!("DC01")),
            Predicate::String {
                operator: StringOp::Contains,
                value: "dc01".into()
            }
        );
        assert_eq!(
            decode("name", "is", json!(null)),
            Predicate::String {
                operator: StringOp::Is,
                value: String::new()
            }
        );
    }

    #[test]
    fn number_operand_absent_unless_zero() {
        let absent = |v: JsonValue| decode("port", "equals", v);
        assert_eq!(
            absent(json!("")),
            Predicate::Number {
                operator: NumberOp::Eq,
                value: None
            }
        );
        assert_eq!(
            absent(json!(null)),
            Predicate::Number {
                operator: NumberOp::Eq,
                value: None
            }
        );
        assert_eq!(
            absent(json!(0)),
            Predicate::Number {
                operator: NumberOp::Eq,
                value: Some(0.0)
            }
        );
        assert_eq!(
            absent(json!("445")),
            Predicate::Number {
                operator: NumberOp::Eq,
                value: Some(445.0)
            }
        );
    }

    #[test]
    fn options_require_non_empty_array() {
        assert_eq!(
            decode("tags", "has_any_of", json!(["a", 2])),
            Predicate::Options {
                operator: OptionsOp::AnyOf,
                value: Some(vec!["a".into(), "2".into()])
            }
        );
        assert_eq!(
            decode("tags", "has_any_of", json!([])),
            Predicate::Options {
                operator: OptionsOp::AnyOf,
                value: None
            }
        );
        assert_eq!(
            decode("tags", "has_none_of", json!("a")),
            Predicate::Options {
                operator: OptionsOp::NoneOf,
                value: None
            }
        );
    }

    #[test]
    fn date_operand_keeps_invalid_input() {
        match decode("created", "is_before", json!("2024-01-01")) {
            Predicate::Datetime {
                operator: DatetimeOp::Before,
                value: Some(DateBound::Valid(_)),
            } => {}
            other => panic!("unexpected predicate: {:?}", other),
        }
        assert_eq!(
            decode("created", "is_before", json!("soon")),
            Predicate::Datetime {
                operator: DatetimeOp::Before,
                value: Some(DateBound::Invalid("soon".into()))
            }
        );
        assert_eq!(
            decode("created", "is_after", json!("")),
            Predicate::Datetime {
                operator: DatetimeOp::After,
                value: None
            }
        );
    }

    #[test]
    fn range_requires_start_and_end() {
        assert_eq!(
            decode("created", "is_between", json!({"start": "2024-01-01"})),
            Predicate::Between { value: None }
        );
        assert_eq!(
            decode("created", "is_between", json!("2024-01-01")),
            Predicate::Between { value: None }
        );
        assert!(matches!(
            decode(
                "created",
                "is_between",
                json!({"start": "2024-01-01", "end": "2024-01-31"})
            ),
            Predicate::Between { value: Some(_) }
        ));
    }

    #[test]
    fn unknown_operator_decodes() {
        assert_eq!(
            decode("name", "regex", json!(".*")),
            Predicate::Unknown {
                operator: "regex".into()
            }
        );
    }

    #[test]
    fn parse_group_document() {
        let json = r#"{
            "conditions": [
                {"column": "severity", "operator": "has_any_of", "value": ["critical", "high"]},
                {"column": "", "operator": "is", "value": "ignored"}
            ],
            "logic": "or"
        }"#;
        let group = parse_filter_group(json).unwrap().unwrap();
        assert_eq!(group.logic, FilterLogic::Or);
        assert_eq!(group.conditions.len(), 1);
        assert_eq!(group.conditions[0].operator(), FilterOperator::HasAnyOf);
    }

    #[test]
    fn parse_group_defaults_to_and() {
        let json = r#"{"conditions": [{"column": "a", "operator": "is_empty"}]}"#;
        let group = parse_filter_group(json).unwrap().unwrap();
        assert_eq!(group.logic, FilterLogic::And);
    }

    #[test]
    fn parse_group_without_complete_conditions_is_inert() {
        let json = r#"{"conditions": [{"column": "a"}], "logic": "and"}"#;
        assert!(parse_filter_group(json).unwrap().is_none());
    }

    #[test]
    fn parse_rejects_invalid_json() {
        assert!(matches!(
            parse_filter_group("not json"),
            Err(FilterError::InvalidJson(_))
        ));
    }

    #[test]
    fn parse_rejects_too_many_conditions() {
        let conditions: Vec<JsonValue> = (0..=MAX_CONDITIONS)
            .map(|i| json!({"column": format!("c{}", i), "operator": "is_empty"}))
            .collect();
        let json = json!({ "conditions": conditions }).to_string();
        assert!(matches!(
            parse_filter_group(&json),
            Err(FilterError::TooManyConditions { .. })
        ));
    }

    #[test]
    fn parse_rejects_oversized_document() {
        let json = format!("\"{}\"", "a".repeat(MAX_FILTER_JSON_SIZE));
        assert!(matches!(
            parse_global_filter(&json),
            Err(FilterError::TooLarge { .. })
        ));
    }

    #[test]
    fn parse_global_filter_shapes() {
        assert_eq!(
            parse_global_filter(r#""admin""#).unwrap(),
            Some(GlobalFilter::Search("admin".into()))
        );
        assert_eq!(parse_global_filter(r#""""#).unwrap(), None);
        assert_eq!(parse_global_filter("null").unwrap(), None);
        assert!(matches!(
            parse_global_filter(r#"{"conditions": [{"column": "a", "operator": "is_empty"}]}"#),
            Ok(Some(GlobalFilter::Group(_)))
        ));
        assert!(matches!(
            parse_global_filter("42"),
            Err(FilterError::InvalidShape)
        ));
    }

    #[test]
    fn parse_document_keeps_incomplete_conditions() {
        let document = parse_filter_document(
            r#"{"conditions": [{"column": "a"}, {"column": "b", "operator": "is_empty"}], "logic": "or"}"#,
        )
        .unwrap();
        assert_eq!(document.conditions.len(), 2);
        assert_eq!(document.logic, FilterLogic::Or);
        assert!(!document.conditions[0].is_complete());
    }
}
