//! Filter errors
//!
//! [`FilterError`] is returned when decoding filter documents at the editor
//! boundary. [`ConditionError`] describes why a single condition could not be
//! evaluated; it never leaves the evaluator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid filter JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Filter JSON exceeds maximum size of {max} bytes")]
    TooLarge { max: usize },

    #[error("Maximum {max} filter conditions allowed")]
    TooManyConditions { max: usize },

    #[error("Cannot filter by column: {0}")]
    UnknownColumn(String),

    #[error("Filter must be a search string or a condition group")]
    InvalidShape,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConditionError {
    #[error("cell value in column '{column}' is not a date")]
    InvalidCellDate { column: String },

    #[error("filter value '{value}' is not a date")]
    InvalidFilterDate { value: String },
}
