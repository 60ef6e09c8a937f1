//! Filter evaluation
//!
//! Pure functions over `(row, filter) -> bool`. Failures never propagate:
//! a condition that cannot be evaluated fails closed, and a failure while
//! combining a group fails open so broken filter logic never hides rows.

use std::panic::{self, AssertUnwindSafe};

use serde_json::Value as JsonValue;

use crate::utils::json::{is_truthy, relation_id, to_display_string, to_number, to_plain_string};
use crate::utils::time::parse_date_value;

use super::error::ConditionError;
use super::types::{
    DateBound, DatetimeOp, EmptyOp, ErrorPolicy, FilterCondition, FilterGroup, FilterLogic,
    GlobalFilter, NumberOp, OptionsOp, Predicate, Row, StringOp,
};

/// Resolution of a condition that failed to evaluate
pub const CONDITION_FAILURE: ErrorPolicy = ErrorPolicy::FailClosed;

/// Resolution of a failure while combining condition results
pub const GROUP_FAILURE: ErrorPolicy = ErrorPolicy::FailOpen;

/// Returns true if the row passes the filter. No filter passes every row.
pub fn matches(row: &Row, filter: Option<&GlobalFilter>) -> bool {
    match filter {
        None => true,
        Some(GlobalFilter::Search(search)) => matches_search(row, search),
        Some(GlobalFilter::Group(group)) => group.evaluate(row),
    }
}

/// Global filter hook in the table-engine shape `(row, column_id, filter)`.
///
/// The column id is ignored: a global filter looks at the whole row.
pub fn global_filter_fn(row: &Row, _column_id: &str, filter: Option<&GlobalFilter>) -> bool {
    matches(row, filter)
}

/// Case-insensitive substring search over every field of the row
pub fn matches_search(row: &Row, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    row.values()
        .any(|value| to_display_string(Some(value)).to_lowercase().contains(&needle))
}

impl FilterGroup {
    /// Evaluate every condition and combine with the group logic.
    ///
    /// An empty group is inert and passes every row.
    pub fn evaluate(&self, row: &Row) -> bool {
        if self.conditions.is_empty() {
            return true;
        }

        self.combine_guarded(|| self.combine(row))
    }

    /// Run a combination step, resolving a panic with [`GROUP_FAILURE`]
    fn combine_guarded(&self, combine: impl FnOnce() -> bool) -> bool {
        match panic::catch_unwind(AssertUnwindSafe(combine)) {
            Ok(passed) => passed,
            Err(_) => {
                tracing::error!(
                    logic = %self.logic,
                    conditions = self.conditions.len(),
                    "Filter group evaluation failed, keeping row"
                );
                GROUP_FAILURE.outcome()
            }
        }
    }

    fn combine(&self, row: &Row) -> bool {
        let mut results = self
            .conditions
            .iter()
            .map(|condition| condition.evaluate_or_policy(row));
        match self.logic {
            FilterLogic::And => results.all(|passed| passed),
            FilterLogic::Or => results.any(|passed| passed),
        }
    }
}

impl FilterCondition {
    /// Evaluate against a row, resolving failures with [`CONDITION_FAILURE`]
    pub fn evaluate_or_policy(&self, row: &Row) -> bool {
        match self.evaluate(row) {
            Ok(passed) => passed,
            Err(e) => {
                tracing::debug!(
                    column = %self.column,
                    operator = %self.operator(),
                    error = %e,
                    "Filter condition failed"
                );
                CONDITION_FAILURE.outcome()
            }
        }
    }

    /// Evaluate against a row
    pub fn evaluate(&self, row: &Row) -> Result<bool, ConditionError> {
        let cell = row.get(&self.column);

        match &self.predicate {
            Predicate::String { operator, value } => Ok(eval_string(*operator, cell, value)),
            Predicate::Empty { operator } => Ok(eval_empty(*operator, cell)),
            Predicate::Number { operator, value } => {
                Ok(value.is_none_or(|operand| eval_number(*operator, cell, operand)))
            }
            Predicate::Options { operator, value } => Ok(value
                .as_deref()
                .is_none_or(|options| eval_options(*operator, cell, options))),
            Predicate::Datetime { operator, value } => match value {
                None => Ok(true),
                Some(bound) => eval_datetime(*operator, &self.column, cell, bound),
            },
            Predicate::Between { value } => match value {
                None => Ok(true),
                Some((start, end)) => eval_between(&self.column, cell, start, end),
            },
            Predicate::Unknown { operator } => {
                tracing::trace!(column = %self.column, operator = %operator, "Skipping unknown operator");
                Ok(true)
            }
        }
    }
}

fn eval_string(operator: StringOp, cell: Option<&JsonValue>, needle: &str) -> bool {
    let haystack = to_display_string(cell).to_lowercase();
    match operator {
        StringOp::Contains => haystack.contains(needle),
        StringOp::DoesNotContain => !haystack.contains(needle),
        StringOp::Is => haystack == needle,
        StringOp::IsNot => haystack != needle,
    }
}

fn eval_empty(operator: EmptyOp, cell: Option<&JsonValue>) -> bool {
    let empty = !is_truthy(cell) || cell.is_some_and(|v| to_plain_string(v).trim().is_empty());
    match operator {
        EmptyOp::IsEmpty => empty,
        EmptyOp::IsNotEmpty => !empty,
    }
}

fn eval_number(operator: NumberOp, cell: Option<&JsonValue>, operand: f64) -> bool {
    let n = to_number(cell);
    match operator {
        NumberOp::Eq => n == operand,
        NumberOp::Ne => n != operand,
        NumberOp::Gt => n > operand,
        NumberOp::Lt => n < operand,
        NumberOp::Gte => n >= operand,
        NumberOp::Lte => n <= operand,
    }
}

/// Values a cell contributes to set membership: relation ids for relation
/// objects, the stringified scalar otherwise
fn cell_members(cell: Option<&JsonValue>) -> Vec<String> {
    let member = |item: &JsonValue| relation_id(item).unwrap_or_else(|| to_plain_string(item));
    match cell {
        Some(JsonValue::Array(items)) => items.iter().map(member).collect(),
        Some(value) if is_truthy(Some(value)) => vec![member(value)],
        _ => Vec::new(),
    }
}

fn eval_options(operator: OptionsOp, cell: Option<&JsonValue>, options: &[String]) -> bool {
    let members = cell_members(cell);
    let any = options.iter().any(|option| members.contains(option));
    match operator {
        OptionsOp::AnyOf => any,
        OptionsOp::NoneOf => !any,
    }
}

fn bound_date(bound: &DateBound) -> Result<chrono::DateTime<chrono::Utc>, ConditionError> {
    match bound {
        DateBound::Valid(dt) => Ok(*dt),
        DateBound::Invalid(value) => Err(ConditionError::InvalidFilterDate {
            value: value.clone(),
        }),
    }
}

fn cell_date(
    column: &str,
    cell: Option<&JsonValue>,
) -> Result<chrono::DateTime<chrono::Utc>, ConditionError> {
    parse_date_value(cell).ok_or_else(|| ConditionError::InvalidCellDate {
        column: column.to_string(),
    })
}

fn eval_datetime(
    operator: DatetimeOp,
    column: &str,
    cell: Option<&JsonValue>,
    bound: &DateBound,
) -> Result<bool, ConditionError> {
    let target = bound_date(bound)?;
    let date = cell_date(column, cell)?;
    Ok(match operator {
        DatetimeOp::On => date.date_naive() == target.date_naive(),
        DatetimeOp::Before => date < target,
        DatetimeOp::After => date > target,
    })
}

fn eval_between(
    column: &str,
    cell: Option<&JsonValue>,
    start: &DateBound,
    end: &DateBound,
) -> Result<bool, ConditionError> {
    let start = bound_date(start)?;
    let end = bound_date(end)?;
    let date = cell_date(column, cell)?;
    Ok(date >= start && date <= end)
}
