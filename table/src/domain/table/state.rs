//! Table state
//!
//! Owns everything that shapes the visible rows: the global filter slot,
//! the filter and sort editors, pagination and selection. Rows flow
//! through `filter -> sort -> paginate`.

use crate::domain::filter::{FilterEditor, GlobalFilter, Row, global_filter_fn};
use crate::domain::sort::{SortEditor, compare_rows};

use super::pagination::Pagination;
use super::selection::{Selection, row_id};

/// A row with its stable id
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub row: Row,
}

/// Result of running rows through the table state
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    /// Rows before filtering
    pub total: usize,
    /// Rows passing the filter
    pub filtered: usize,
    pub page_index: usize,
    pub page_count: usize,
    /// Rows of the current page
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default)]
pub struct TableState {
    filter: Option<GlobalFilter>,
    filters: FilterEditor,
    sort: SortEditor,
    pagination: Pagination,
    selection: Selection,
}

impl TableState {
    pub fn new(pagination: Pagination) -> Self {
        Self {
            pagination,
            ..Self::default()
        }
    }

    pub fn global_filter(&self) -> Option<&GlobalFilter> {
        self.filter.as_ref()
    }

    /// Put a plain search in the filter slot.
    ///
    /// Refused while an advanced group occupies the slot. An empty search
    /// clears the slot.
    pub fn set_search(&mut self, search: &str) -> bool {
        if self.filter.as_ref().is_some_and(GlobalFilter::is_group) {
            tracing::debug!("Search ignored while advanced filters are active");
            return false;
        }
        self.filter = if search.is_empty() {
            None
        } else {
            Some(GlobalFilter::Search(search.to_string()))
        };
        self.pagination.reset();
        true
    }

    pub fn filter_editor(&self) -> &FilterEditor {
        &self.filters
    }

    /// Edit the filter conditions. Any edit hands the filter slot to the
    /// editor: it holds the editor's group, or nothing when no condition
    /// is complete.
    pub fn edit_filters<R>(&mut self, edit: impl FnOnce(&mut FilterEditor) -> R) -> R {
        let result = edit(&mut self.filters);
        self.filter = self.filters.to_global_filter();
        self.pagination.reset();
        tracing::trace!(
            conditions = self.filters.entries().len(),
            active = self.filter.is_some(),
            "Filter editor synchronized"
        );
        result
    }

    pub fn sort(&self) -> &SortEditor {
        &self.sort
    }

    pub fn edit_sort<R>(&mut self, edit: impl FnOnce(&mut SortEditor) -> R) -> R {
        edit(&mut self.sort)
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn toggle_selected(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    /// Select every row passing the current filter
    pub fn select_all(&mut self, rows: &[Row]) {
        let ids: Vec<String> = self.filtered_rows(rows).into_iter().map(|r| r.id).collect();
        self.selection.select(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Reset sorting, the filter slot and the filter editor
    pub fn clear_all(&mut self) {
        self.sort.clear();
        self.filter = None;
        self.filters.reset();
        self.pagination.reset();
    }

    /// Rows passing the filter, in sort order
    pub fn filtered_rows(&self, rows: &[Row]) -> Vec<TableRow> {
        let mut filtered: Vec<TableRow> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| global_filter_fn(row, "", self.filter.as_ref()))
            .map(|(index, row)| TableRow {
                id: row_id(row, index),
                row: row.clone(),
            })
            .collect();

        let keys = self.sort.keys();
        if !keys.is_empty() {
            filtered.sort_by(|a, b| compare_rows(&a.row, &b.row, keys));
        }
        filtered
    }

    /// Filter, sort and paginate
    pub fn compute(&self, rows: &[Row]) -> TableView {
        let mut filtered = self.filtered_rows(rows);
        let filtered_count = filtered.len();
        let range = self.pagination.page_range(filtered_count);
        let page: Vec<TableRow> = filtered.drain(range).collect();

        tracing::debug!(
            total = rows.len(),
            filtered = filtered_count,
            page = self.pagination.page_index,
            "Table computed"
        );

        TableView {
            total: rows.len(),
            filtered: filtered_count,
            page_index: self.pagination.page_index,
            page_count: self.pagination.page_count(filtered_count),
            rows: page,
        }
    }

    /// Rows that are selected and pass the current filter
    pub fn selected_rows(&self, rows: &[Row]) -> Vec<TableRow> {
        self.filtered_rows(rows)
            .into_iter()
            .filter(|r| self.selection.is_selected(&r.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::FilterLogic;
    use crate::domain::sort::SortKey;
    use serde_json::{Value as JsonValue, json};

    fn findings() -> Vec<Row> {
        json!([
            {"id": 1, "title": "SMB signing", "severity": "critical"},
            {"id": 2, "title": "Weak TLS", "severity": "medium"},
            {"id": 3, "title": "Default creds", "severity": "high"},
            {"id": 4, "title": "Info leak", "severity": "low"},
            {"id": 5, "title": "Kerberoast", "severity": "high"}
        ])
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
    }

    fn ids(rows: &[TableRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    fn add_condition(state: &mut TableState, column: &str, operator: &str, value: JsonValue) {
        state.edit_filters(|editor| {
            let id = editor.add();
            editor.set_column(id, column);
            editor.set_operator(id, operator);
            editor.set_value(id, value);
        });
    }

    #[test]
    fn no_filter_keeps_everything() {
        let state = TableState::default();
        let view = state.compute(&findings());
        assert_eq!(view.total, 5);
        assert_eq!(view.filtered, 5);
        assert_eq!(view.page_count, 1);
    }

    #[test]
    fn search_filters_rows() {
        let mut state = TableState::default();
        assert!(state.set_search("TLS"));
        let view = state.compute(&findings());
        assert_eq!(ids(&view.rows), vec!["2"]);
    }

    #[test]
    fn group_filter_keeps_matching_severities() {
        let mut state = TableState::default();
        add_condition(&mut state, "severity", "has_any_of", json!(["critical", "high"]));
        let view = state.compute(&findings());
        assert_eq!(ids(&view.rows), vec!["1", "3", "5"]);
    }

    #[test]
    fn search_refused_while_group_active() {
        let mut state = TableState::default();
        add_condition(&mut state, "severity", "is", json!("low"));
        assert!(!state.set_search("TLS"));
        assert!(state.global_filter().is_some_and(GlobalFilter::is_group));
    }

    #[test]
    fn incomplete_editor_entries_clear_the_slot() {
        let mut state = TableState::default();
        state.set_search("TLS");
        state.edit_filters(|editor| editor.add());
        assert!(state.global_filter().is_none());
        assert!(state.filter_editor().has_filters());
        assert!(state.set_search("TLS"));
    }

    #[test]
    fn or_logic_combines_conditions() {
        let mut state = TableState::default();
        add_condition(&mut state, "severity", "is", json!("low"));
        add_condition(&mut state, "title", "contains", json!("tls"));
        assert!(state.compute(&findings()).rows.is_empty());

        state.edit_filters(|editor| editor.set_logic(FilterLogic::Or));
        assert_eq!(ids(&state.compute(&findings()).rows), vec!["2", "4"]);
    }

    #[test]
    fn sort_then_paginate() {
        let mut state = TableState::new(Pagination::new(2));
        state.edit_sort(|sort| {
            sort.add("severity");
            sort.add("title");
        });
        let view = state.compute(&findings());
        assert_eq!(view.page_count, 3);
        assert_eq!(ids(&view.rows), vec!["1", "3"]);

        state.pagination_mut().page_index = 1;
        assert_eq!(ids(&state.compute(&findings()).rows), vec!["5", "4"]);

        state.pagination_mut().page_index = 9;
        assert!(state.compute(&findings()).rows.is_empty());
    }

    #[test]
    fn filter_change_returns_to_first_page() {
        let mut state = TableState::new(Pagination::new(2));
        state.pagination_mut().page_index = 2;
        state.set_search("e");
        assert_eq!(state.pagination().page_index, 0);
    }

    #[test]
    fn selected_rows_respect_filter() {
        let mut state = TableState::default();
        let rows = findings();
        state.toggle_selected("1");
        state.toggle_selected("2");
        add_condition(&mut state, "severity", "is", json!("critical"));
        assert_eq!(ids(&state.selected_rows(&rows)), vec!["1"]);
        assert_eq!(state.selection().len(), 2);
    }

    #[test]
    fn select_all_covers_filtered_rows_only() {
        let mut state = TableState::default();
        let rows = findings();
        add_condition(&mut state, "severity", "is", json!("high"));
        state.select_all(&rows);
        assert_eq!(state.selection().len(), 2);
        assert!(state.selection().is_selected("3"));
        assert!(state.selection().is_selected("5"));
        state.clear_selection();
        assert!(state.selected_rows(&rows).is_empty());
    }

    #[test]
    fn clear_all_resets_sort_and_filters() {
        let mut state = TableState::default();
        state.edit_sort(|sort| sort.add("title"));
        add_condition(&mut state, "severity", "is", json!("high"));
        state.edit_filters(|editor| editor.set_logic(FilterLogic::Or));

        state.clear_all();
        assert!(state.sort().is_empty());
        assert!(state.global_filter().is_none());
        assert!(!state.filter_editor().has_filters());
        assert_eq!(state.filter_editor().logic(), FilterLogic::Or);
        assert_eq!(state.compute(&findings()).filtered, 5);
    }

    #[test]
    fn sort_keys_apply_to_view() {
        let mut state = TableState::default();
        state.edit_sort(|sort| {
            sort.add("id");
            sort.toggle("id");
        });
        assert_eq!(state.sort().keys(), &[SortKey::desc("id")]);
        assert_eq!(
            ids(&state.compute(&findings()).rows),
            vec!["5", "4", "3", "2", "1"]
        );
    }
}
