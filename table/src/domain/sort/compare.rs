//! Multi-key row ordering

use std::cmp::Ordering;

use serde_json::Value as JsonValue;

use crate::domain::filter::Row;
use crate::utils::json::to_plain_string;

use super::types::{SortDirection, SortKey};

/// Sort rows in place by the given keys. The sort is stable and keys are
/// applied in order until one differs.
pub fn sort_rows(rows: &mut [Row], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    rows.sort_by(|a, b| compare_rows(a, b, keys));
}

/// Compare two rows over all keys
pub fn compare_rows(a: &Row, b: &Row, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ordering = compare_cells(a.get(&key.column), b.get(&key.column), key.direction);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_cells(a: Option<&JsonValue>, b: Option<&JsonValue>, direction: SortDirection) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    // Missing values sink regardless of direction
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = compare_values(a, b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

fn type_rank(value: &JsonValue) -> u8 {
    match value {
        JsonValue::Number(_) => 0,
        JsonValue::Bool(_) => 1,
        JsonValue::String(_) | JsonValue::Object(_) => 2,
        JsonValue::Array(_) | JsonValue::Null => 3,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        (JsonValue::Array(x), JsonValue::Array(y)) => x
            .len()
            .cmp(&y.len())
            .then_with(|| compare_text(&to_plain_string(a), &to_plain_string(b))),
        _ => match type_rank(a).cmp(&type_rank(b)) {
            // Strings and relations compare through their rendering
            Ordering::Equal => compare_text(&to_plain_string(a), &to_plain_string(b)),
            other => other,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: JsonValue) -> Vec<Row> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    fn ids(rows: &[Row]) -> Vec<i64> {
        rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn sorts_numbers_numerically() {
        let mut data = rows(json!([
            {"id": 0, "port": 445},
            {"id": 1, "port": 22},
            {"id": 2, "port": 8080},
            {"id": 3, "port": 80.5}
        ]));
        sort_rows(&mut data, &[SortKey::asc("port")]);
        assert_eq!(ids(&data), vec![1, 3, 0, 2]);
        sort_rows(&mut data, &[SortKey::desc("port")]);
        assert_eq!(ids(&data), vec![2, 0, 3, 1]);
    }

    #[test]
    fn nulls_sink_in_both_directions() {
        let mut data = rows(json!([
            {"id": 0, "name": null},
            {"id": 1, "name": "b"},
            {"id": 2},
            {"id": 3, "name": "a"}
        ]));
        sort_rows(&mut data, &[SortKey::asc("name")]);
        assert_eq!(ids(&data), vec![3, 1, 0, 2]);
        sort_rows(&mut data, &[SortKey::desc("name")]);
        assert_eq!(ids(&data), vec![1, 3, 0, 2]);
    }

    #[test]
    fn strings_ignore_case() {
        let mut data = rows(json!([
            {"id": 0, "host": "web01"},
            {"id": 1, "host": "DC01"},
            {"id": 2, "host": "app01"}
        ]));
        sort_rows(&mut data, &[SortKey::asc("host")]);
        assert_eq!(ids(&data), vec![2, 1, 0]);
    }

    #[test]
    fn secondary_key_breaks_ties_and_sort_is_stable() {
        let mut data = rows(json!([
            {"id": 0, "sev": "high", "host": "b"},
            {"id": 1, "sev": "low", "host": "a"},
            {"id": 2, "sev": "high", "host": "a"},
            {"id": 3, "sev": "low", "host": "a"}
        ]));
        sort_rows(&mut data, &[SortKey::asc("sev"), SortKey::asc("host")]);
        assert_eq!(ids(&data), vec![2, 0, 1, 3]);
    }

    #[test]
    fn relations_sort_by_repr() {
        let mut data = rows(json!([
            {"id": 0, "owner": {"id": 5, "repr": "zoe"}},
            {"id": 1, "owner": {"id": 9, "repr": "adam"}}
        ]));
        sort_rows(&mut data, &[SortKey::asc("owner")]);
        assert_eq!(ids(&data), vec![1, 0]);
    }

    #[test]
    fn arrays_by_length_then_rendering() {
        let mut data = rows(json!([
            {"id": 0, "tags": ["b", "c"]},
            {"id": 1, "tags": ["z"]},
            {"id": 2, "tags": ["a", "c"]}
        ]));
        sort_rows(&mut data, &[SortKey::asc("tags")]);
        assert_eq!(ids(&data), vec![1, 2, 0]);
    }

    #[test]
    fn mixed_types_follow_rank() {
        let mut data = rows(json!([
            {"id": 0, "v": "text"},
            {"id": 1, "v": true},
            {"id": 2, "v": 3},
            {"id": 3, "v": [1]}
        ]));
        sort_rows(&mut data, &[SortKey::asc("v")]);
        assert_eq!(ids(&data), vec![2, 1, 0, 3]);
    }

    #[test]
    fn booleans_false_first() {
        let mut data = rows(json!([
            {"id": 0, "admin": true},
            {"id": 1, "admin": false}
        ]));
        sort_rows(&mut data, &[SortKey::asc("admin")]);
        assert_eq!(ids(&data), vec![1, 0]);
    }
}
