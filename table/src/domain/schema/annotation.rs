//! Field annotation parsing
//!
//! The API describes field types with Python-style annotations such as
//! `<class 'str'>`, `Entity(user)` or `set[Entity(control_definition)]`.
//! These map to a column variant that decides which filter operators and
//! which value rendering a column gets.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::types::FieldSchema;

static RE_SET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^set\[(.+)\]$").expect("Invalid regex"));
static RE_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^list\[(.+)\]$").expect("Invalid regex"));
static RE_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Entity\((.+)\)").expect("Invalid regex"));
static RE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<class '(.+)'>").expect("Invalid regex"));

/// Column variant driving editor and rendering behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnVariant {
    #[default]
    Text,
    Number,
    Select,
    Date,
    Boolean,
    MultiSelect,
}

impl fmt::Display for ColumnVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Number => write!(f, "number"),
            Self::Select => write!(f, "select"),
            Self::Date => write!(f, "date"),
            Self::Boolean => write!(f, "boolean"),
            Self::MultiSelect => write!(f, "multiSelect"),
        }
    }
}

/// Type information derived from a field's annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnTypeInfo {
    pub variant: ColumnVariant,
    pub is_array: bool,
    pub is_relation: bool,
    pub base_type: &'static str,
    pub referenced_entity: Option<String>,
}

impl ColumnTypeInfo {
    fn primitive((variant, base_type): (ColumnVariant, &'static str), is_array: bool) -> Self {
        Self {
            variant,
            is_array,
            is_relation: false,
            base_type,
            referenced_entity: None,
        }
    }

    fn relation(variant: ColumnVariant, is_array: bool, entity: &str) -> Self {
        Self {
            variant,
            is_array,
            is_relation: true,
            base_type: "relation",
            referenced_entity: Some(entity.to_string()),
        }
    }
}

/// Determine the column type of a field.
///
/// Fields with choices are always `select`; collections of entities are
/// multi-valued relations; `Entity(x)` is a single relation; everything else
/// maps through its primitive type name.
pub fn parse_field_annotation(field: &FieldSchema) -> ColumnTypeInfo {
    let annotation = field.annotation.trim();

    if field.choices.as_ref().is_some_and(|c| !c.is_empty()) {
        return ColumnTypeInfo::primitive((ColumnVariant::Select, "string"), false);
    }

    let inner = RE_SET
        .captures(annotation)
        .or_else(|| RE_LIST.captures(annotation))
        .and_then(|caps| caps.get(1));
    if let Some(inner) = inner {
        let inner = inner.as_str();
        if let Some(entity) = RE_ENTITY.captures(inner).and_then(|caps| caps.get(1)) {
            return ColumnTypeInfo::relation(ColumnVariant::MultiSelect, true, entity.as_str());
        }
        return ColumnTypeInfo::primitive(parse_basic_type(inner), true);
    }

    if let Some(entity) = RE_ENTITY.captures(annotation).and_then(|caps| caps.get(1)) {
        return ColumnTypeInfo::relation(ColumnVariant::Select, false, entity.as_str());
    }

    if let Some(class) = RE_CLASS.captures(annotation).and_then(|caps| caps.get(1)) {
        return ColumnTypeInfo::primitive(parse_basic_type(class.as_str()), false);
    }

    ColumnTypeInfo::primitive(parse_basic_type(annotation), false)
}

fn parse_basic_type(type_str: &str) -> (ColumnVariant, &'static str) {
    let lower = type_str.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has(&["str", "string"]) {
        (ColumnVariant::Text, "string")
    } else if has(&["int", "integer", "float", "decimal", "number"]) {
        (ColumnVariant::Number, "number")
    } else if has(&["bool", "boolean"]) {
        (ColumnVariant::Boolean, "boolean")
    } else if has(&["date", "time"]) {
        (ColumnVariant::Date, "date")
    } else {
        (ColumnVariant::Text, "string")
    }
}
