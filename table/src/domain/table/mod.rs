//! Table engine
//!
//! Combines the filter, sort, pagination and selection pieces into one
//! owned [`TableState`], runs bulk actions over its selection and renders
//! pages as text.

mod bulk;
mod pagination;
mod render;
mod selection;
mod state;

pub use bulk::{BulkAction, BulkOutcome, run_bulk_action};
pub use pagination::{DEFAULT_PAGE_SIZE, Pagination};
pub use render::{Column, render_operators, render_table, visible_columns};
pub use selection::{Selection, row_id};
pub use state::{TableRow, TableState, TableView};
