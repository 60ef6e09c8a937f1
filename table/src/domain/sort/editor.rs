//! Sort editor state
//!
//! Ordered list of sort keys; the first key is the primary sort.

use super::types::{SortDirection, SortKey};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortEditor {
    keys: Vec<SortKey>,
}

impl SortEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(keys: Vec<SortKey>) -> Self {
        let mut editor = Self::new();
        for key in keys {
            if !editor.contains(&key.column) {
                editor.keys.push(key);
            }
        }
        editor
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.keys.iter().any(|k| k.column == column)
    }

    /// Append an ascending key. Columns already sorted are left untouched.
    pub fn add(&mut self, column: impl Into<String>) -> bool {
        let column = column.into();
        if self.contains(&column) {
            return false;
        }
        self.keys.push(SortKey::new(column, SortDirection::Asc));
        true
    }

    /// Flip the direction of one key
    pub fn toggle(&mut self, column: &str) -> bool {
        match self.keys.iter_mut().find(|k| k.column == column) {
            Some(key) => {
                key.direction = key.direction.toggled();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, column: &str) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k.column != column);
        self.keys.len() != before
    }

    /// Move the key at `from` to position `to`. Out-of-range indexes are ignored.
    pub fn move_entry(&mut self, from: usize, to: usize) {
        if from == to || from >= self.keys.len() || to >= self.keys.len() {
            return;
        }
        let key = self.keys.remove(from);
        self.keys.insert(to, key);
    }

    /// Reorder keys to follow `order`; columns not currently sorted are
    /// dropped, repeated columns keep their first position, and sorted
    /// columns missing from `order` are removed.
    pub fn reorder(&mut self, order: &[&str]) {
        let mut reordered: Vec<SortKey> = Vec::with_capacity(self.keys.len());
        for column in order {
            if reordered.iter().any(|k| k.column == *column) {
                continue;
            }
            if let Some(key) = self.keys.iter().find(|k| k.column == *column) {
                reordered.push(key.clone());
            }
        }
        self.keys = reordered;
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Sortable columns not yet used by a key, in the given order
    pub fn available<'a>(&self, sortable: &[&'a str]) -> Vec<&'a str> {
        sortable
            .iter()
            .copied()
            .filter(|column| !self.contains(column))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(editor: &SortEditor) -> Vec<&str> {
        editor.keys().iter().map(|k| k.column.as_str()).collect()
    }

    #[test]
    fn add_appends_ascending_once() {
        let mut editor = SortEditor::new();
        assert!(editor.add("severity"));
        assert!(editor.add("hostname"));
        assert!(!editor.add("severity"));
        assert_eq!(columns(&editor), vec!["severity", "hostname"]);
        assert_eq!(editor.keys()[0].direction, SortDirection::Asc);
    }

    #[test]
    fn toggle_flips_only_that_key() {
        let mut editor = SortEditor::with_keys(vec![SortKey::asc("a"), SortKey::asc("b")]);
        assert!(editor.toggle("b"));
        assert_eq!(editor.keys()[0].direction, SortDirection::Asc);
        assert_eq!(editor.keys()[1].direction, SortDirection::Desc);
        assert!(editor.toggle("b"));
        assert_eq!(editor.keys()[1].direction, SortDirection::Asc);
        assert!(!editor.toggle("missing"));
    }

    #[test]
    fn remove_drops_only_that_key() {
        let mut editor =
            SortEditor::with_keys(vec![SortKey::asc("a"), SortKey::desc("b"), SortKey::asc("c")]);
        assert!(editor.remove("b"));
        assert_eq!(columns(&editor), vec!["a", "c"]);
        assert!(!editor.remove("b"));
    }

    #[test]
    fn move_entry_changes_precedence() {
        let mut editor =
            SortEditor::with_keys(vec![SortKey::asc("a"), SortKey::asc("b"), SortKey::asc("c")]);
        editor.move_entry(2, 0);
        assert_eq!(columns(&editor), vec!["c", "a", "b"]);
        editor.move_entry(0, 9);
        assert_eq!(columns(&editor), vec!["c", "a", "b"]);
    }

    #[test]
    fn reorder_follows_given_ids() {
        let mut editor =
            SortEditor::with_keys(vec![SortKey::asc("a"), SortKey::desc("b"), SortKey::asc("c")]);
        editor.reorder(&["b", "zzz", "a"]);
        assert_eq!(columns(&editor), vec!["b", "a"]);
        assert_eq!(editor.keys()[0].direction, SortDirection::Desc);
    }

    #[test]
    fn with_keys_skips_duplicates() {
        let editor = SortEditor::with_keys(vec![SortKey::asc("a"), SortKey::desc("a")]);
        assert_eq!(editor.keys(), &[SortKey::asc("a")]);
    }

    #[test]
    fn available_excludes_sorted_columns() {
        let editor = SortEditor::with_keys(vec![SortKey::asc("ip")]);
        assert_eq!(editor.available(&["hostname", "ip", "os"]), vec!["hostname", "os"]);
    }

    #[test]
    fn clear_removes_everything() {
        let mut editor = SortEditor::with_keys(vec![SortKey::asc("ip")]);
        editor.clear();
        assert!(editor.is_empty());
    }

    #[test]
    fn reorder_ignores_repeated_columns() {
        let mut editor = SortEditor::with_keys(vec![SortKey::asc("a"), SortKey::desc("b")]);
        editor.reorder(&["a", "a", "b", "b"]);
        assert_eq!(columns(&editor), vec!["a", "b"]);
        assert_eq!(editor.keys()[1].direction, SortDirection::Desc);
    }
}
