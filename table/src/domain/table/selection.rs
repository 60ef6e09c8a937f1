//! Row selection

use std::collections::BTreeSet;

use serde_json::Value as JsonValue;

use crate::domain::filter::Row;
use crate::utils::json::to_plain_string;

/// Stable row identifier: the `id` field when present, else the row index
pub fn row_id(row: &Row, index: usize) -> String {
    match row.get("id") {
        None | Some(JsonValue::Null) => index.to_string(),
        Some(id) => {
            let id = to_plain_string(id);
            if id.is_empty() { index.to_string() } else { id }
        }
    }
}

/// Set of selected row ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    /// Flip one row; returns whether it is now selected
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn select<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
