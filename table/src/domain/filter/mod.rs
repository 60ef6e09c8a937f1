//! Record filter system
//!
//! A table has one global filter slot holding either a plain search string
//! or an advanced condition group. Conditions are authored in the
//! [`FilterEditor`], decoded into typed predicates, and evaluated per row.
//!
//! ## Usage
//!
//! ```
//! use cybsuite_table::domain::filter::{matches, parse_global_filter};
//! use serde_json::json;
//!
//! let filter = parse_global_filter(
//!     r#"{"conditions": [{"column": "severity", "operator": "has_any_of", "value": ["high"]}]}"#,
//! )
//! .unwrap();
//! let row = json!({"severity": "high"}).as_object().cloned().unwrap();
//! assert!(matches(&row, filter.as_ref()));
//! ```

mod editor;
mod error;
mod eval;
mod parser;
mod types;

pub use editor::{FilterEditor, FilterEntry};
pub use error::{ConditionError, FilterError};
pub use eval::{CONDITION_FAILURE, GROUP_FAILURE, global_filter_fn, matches, matches_search};
pub use parser::{
    FilterDocument, MAX_CONDITIONS, MAX_FILTER_JSON_SIZE, build_group, decode_condition,
    parse_filter_document, parse_filter_group, parse_global_filter,
};
pub use types::{
    DateBound, DatetimeOp, EmptyOp, ErrorPolicy, FilterCondition, FilterGroup, FilterLogic,
    FilterOperator, GlobalFilter, NumberOp, OptionsOp, Predicate, RawCondition, Row, StringOp,
};
