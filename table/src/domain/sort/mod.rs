//! Row sorting
//!
//! A [`SortEditor`] holds the ordered sort keys; [`sort_rows`] applies
//! them to a row set.

mod compare;
mod editor;
mod types;

pub use compare::{compare_rows, sort_rows};
pub use editor::SortEditor;
pub use types::{SortDirection, SortKey};
