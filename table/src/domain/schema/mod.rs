//! Entity schema model
//!
//! Field records from the API, annotation parsing into column types, the
//! operator set offered per column, and value rendering.

mod annotation;
mod format;
mod operators;
mod types;

pub use annotation::{ColumnTypeInfo, ColumnVariant, parse_field_annotation};
pub use format::{EMPTY_PLACEHOLDER, format_field_value};
pub use operators::operators_for;
pub use types::{EntitySchema, FieldSchema};
