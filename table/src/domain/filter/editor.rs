//! Filter editor state
//!
//! Owns the ordered list of conditions being authored. The editor is the
//! only writer; its output flows one way into the table's global filter.

use serde_json::Value as JsonValue;

use super::parser::build_group;
use super::types::{FilterLogic, GlobalFilter, RawCondition};

/// A condition in the editor, addressed by a stable id
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    pub id: u64,
    pub condition: RawCondition,
}

#[derive(Debug, Clone, Default)]
pub struct FilterEditor {
    entries: Vec<FilterEntry>,
    logic: FilterLogic,
    next_id: u64,
}

impl FilterEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the editor from existing conditions (e.g. a filter document)
    pub fn with_conditions(conditions: Vec<RawCondition>, logic: FilterLogic) -> Self {
        let mut editor = Self {
            logic,
            ..Self::default()
        };
        for condition in conditions {
            let id = editor.add();
            if let Some(entry) = editor.entry_mut(id) {
                entry.condition = condition;
            }
        }
        editor
    }

    /// Append an empty condition and return its id
    pub fn add(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(FilterEntry {
            id,
            condition: RawCondition::default(),
        });
        id
    }

    fn entry_mut(&mut self, id: u64) -> Option<&mut FilterEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Change the column; operator and value are reset
    pub fn set_column(&mut self, id: u64, column: impl Into<String>) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.condition = RawCondition {
                    column: column.into(),
                    ..RawCondition::default()
                };
                true
            }
            None => false,
        }
    }

    /// Change the operator; the value is reset
    pub fn set_operator(&mut self, id: u64, operator: impl Into<String>) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.condition.operator = operator.into();
                entry.condition.value = JsonValue::Null;
                true
            }
            None => false,
        }
    }

    pub fn set_value(&mut self, id: u64, value: JsonValue) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.condition.value = value;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Move the entry at `from` to position `to`. Out-of-range indexes are ignored.
    pub fn move_entry(&mut self, from: usize, to: usize) {
        if from == to || from >= self.entries.len() || to >= self.entries.len() {
            return;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
    }

    pub fn set_logic(&mut self, logic: FilterLogic) {
        self.logic = logic;
    }

    pub fn logic(&self) -> FilterLogic {
        self.logic
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    /// True while any entry exists, complete or not
    pub fn has_filters(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Drop every entry. Logic is kept.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Global filter produced by the complete entries, or `None` when no
    /// entry is complete
    pub fn to_global_filter(&self) -> Option<GlobalFilter> {
        let conditions: Vec<RawCondition> =
            self.entries.iter().map(|e| e.condition.clone()).collect();
        build_group(&conditions, self.logic).map(GlobalFilter::Group)
    }
}
