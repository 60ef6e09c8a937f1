//! Filter type definitions
//!
//! Conditions are decoded once, at the editor boundary, into a [`Predicate`]
//! whose variant fixes the shape of the operand. Evaluation never inspects
//! raw JSON filter values.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::FilterError;

/// A record row: field name to value. Absent keys differ from `null`.
pub type Row = serde_json::Map<String, JsonValue>;

/// How condition results are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterLogic {
    #[default]
    And,
    Or,
}

impl fmt::Display for FilterLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}

/// Operator names offered by the filter editor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOperator {
    Contains,
    DoesNotContain,
    Is,
    IsNot,
    IsEmpty,
    IsNotEmpty,
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    HasAnyOf,
    HasNoneOf,
    IsOn,
    IsBefore,
    IsAfter,
    IsBetween,
    /// Operator name this build does not know; evaluates vacuously true
    Unknown(String),
}

impl FilterOperator {
    pub fn parse(name: &str) -> Self {
        match name {
            "contains" => Self::Contains,
            "does_not_contain" => Self::DoesNotContain,
            "is" => Self::Is,
            "is_not" => Self::IsNot,
            "is_empty" => Self::IsEmpty,
            "is_not_empty" => Self::IsNotEmpty,
            "equals" => Self::Equals,
            "not_equals" => Self::NotEquals,
            "greater_than" => Self::GreaterThan,
            "less_than" => Self::LessThan,
            "greater_equal" => Self::GreaterEqual,
            "less_equal" => Self::LessEqual,
            "has_any_of" => Self::HasAnyOf,
            "has_none_of" => Self::HasNoneOf,
            "is_on" => Self::IsOn,
            "is_before" => Self::IsBefore,
            "is_after" => Self::IsAfter,
            "is_between" => Self::IsBetween,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Wire name (`snake_case`)
    pub fn as_str(&self) -> &str {
        match self {
            Self::Contains => "contains",
            Self::DoesNotContain => "does_not_contain",
            Self::Is => "is",
            Self::IsNot => "is_not",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterEqual => "greater_equal",
            Self::LessEqual => "less_equal",
            Self::HasAnyOf => "has_any_of",
            Self::HasNoneOf => "has_none_of",
            Self::IsOn => "is_on",
            Self::IsBefore => "is_before",
            Self::IsAfter => "is_after",
            Self::IsBetween => "is_between",
            Self::Unknown(name) => name,
        }
    }

    /// Human-readable label shown in the editor
    pub fn label(&self) -> &str {
        match self {
            Self::Contains => "contains",
            Self::DoesNotContain => "does not contain",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::IsEmpty => "is empty",
            Self::IsNotEmpty => "is not empty",
            Self::Equals => "equals",
            Self::NotEquals => "not equals",
            Self::GreaterThan => "greater than",
            Self::LessThan => "less than",
            Self::GreaterEqual => "greater than or equal",
            Self::LessEqual => "less than or equal",
            Self::HasAnyOf => "has any of",
            Self::HasNoneOf => "has none of",
            Self::IsOn => "is on",
            Self::IsBefore => "is before",
            Self::IsAfter => "is after",
            Self::IsBetween => "is between",
            Self::Unknown(name) => name,
        }
    }

    /// Returns true if this operator takes a value input
    pub fn requires_value(&self) -> bool {
        !matches!(self, Self::IsEmpty | Self::IsNotEmpty)
    }
}

impl From<String> for FilterOperator {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOp {
    Contains,
    DoesNotContain,
    Is,
    IsNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyOp {
    IsEmpty,
    IsNotEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsOp {
    AnyOf,
    NoneOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatetimeOp {
    On,
    Before,
    After,
}

/// A decoded date operand. Unparsable input is kept so evaluation can fail
/// the condition instead of treating it as absent.
#[derive(Debug, Clone, PartialEq)]
pub enum DateBound {
    Valid(DateTime<Utc>),
    Invalid(String),
}

/// Operator plus its typed operand.
///
/// `None` operands mean the user supplied no usable value; those conditions
/// are vacuously true.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Lowercased needle; absent values render as `""`
    String { operator: StringOp, value: String },
    Empty { operator: EmptyOp },
    Number {
        operator: NumberOp,
        value: Option<f64>,
    },
    Options {
        operator: OptionsOp,
        value: Option<Vec<String>>,
    },
    Datetime {
        operator: DatetimeOp,
        value: Option<DateBound>,
    },
    Between {
        value: Option<(DateBound, DateBound)>,
    },
    Unknown { operator: String },
}

impl Predicate {
    /// Operator this predicate was decoded from
    pub fn operator(&self) -> FilterOperator {
        match self {
            Self::String { operator, .. } => match operator {
                StringOp::Contains => FilterOperator::Contains,
                StringOp::DoesNotContain => FilterOperator::DoesNotContain,
                StringOp::Is => FilterOperator::Is,
                StringOp::IsNot => FilterOperator::IsNot,
            },
            Self::Empty { operator } => match operator {
                EmptyOp::IsEmpty => FilterOperator::IsEmpty,
                EmptyOp::IsNotEmpty => FilterOperator::IsNotEmpty,
            },
            Self::Number { operator, .. } => match operator {
                NumberOp::Eq => FilterOperator::Equals,
                NumberOp::Ne => FilterOperator::NotEquals,
                NumberOp::Gt => FilterOperator::GreaterThan,
                NumberOp::Lt => FilterOperator::LessThan,
                NumberOp::Gte => FilterOperator::GreaterEqual,
                NumberOp::Lte => FilterOperator::LessEqual,
            },
            Self::Options { operator, .. } => match operator {
                OptionsOp::AnyOf => FilterOperator::HasAnyOf,
                OptionsOp::NoneOf => FilterOperator::HasNoneOf,
            },
            Self::Datetime { operator, .. } => match operator {
                DatetimeOp::On => FilterOperator::IsOn,
                DatetimeOp::Before => FilterOperator::IsBefore,
                DatetimeOp::After => FilterOperator::IsAfter,
            },
            Self::Between { .. } => FilterOperator::IsBetween,
            Self::Unknown { operator } => FilterOperator::Unknown(operator.clone()),
        }
    }
}

/// One condition as authored: free-form operator name and raw JSON value.
///
/// This is the shape stored by the filter editor and read from filter
/// documents. Column or operator may still be empty while being edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCondition {
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: JsonValue,
}

impl RawCondition {
    pub fn new(column: impl Into<String>, operator: impl Into<String>, value: JsonValue) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value,
        }
    }

    /// Column and operator are both set
    pub fn is_complete(&self) -> bool {
        !self.column.is_empty() && !self.operator.is_empty()
    }
}

/// A decoded, evaluable condition
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub column: String,
    pub predicate: Predicate,
}

impl FilterCondition {
    pub fn operator(&self) -> FilterOperator {
        self.predicate.operator()
    }
}

/// Conditions combined uniformly with one logic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGroup {
    pub conditions: Vec<FilterCondition>,
    pub logic: FilterLogic,
}

impl FilterGroup {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Validate condition columns against a whitelist of known fields
    pub fn validate(&self, allowed_columns: &[&str]) -> Result<(), FilterError> {
        for condition in &self.conditions {
            if !allowed_columns.contains(&condition.column.as_str()) {
                return Err(FilterError::UnknownColumn(condition.column.clone()));
            }
        }
        Ok(())
    }
}

/// The single active global filter of a table
#[derive(Debug, Clone, PartialEq)]
pub enum GlobalFilter {
    /// Case-insensitive search across every field
    Search(String),
    /// Advanced condition group
    Group(FilterGroup),
}

impl GlobalFilter {
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

/// What an internal failure resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Keep the row
    FailOpen,
    /// Drop the row
    FailClosed,
}

impl ErrorPolicy {
    pub fn outcome(self) -> bool {
        matches!(self, Self::FailOpen)
    }
}
