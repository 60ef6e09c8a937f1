//! Schema records as served by the CRUD API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One field of an entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSchema {
    pub name: String,
    pub pretty_name: String,
    pub plural_name: String,
    pub display_name: String,
    pub annotation: String,
    pub choices: Option<Vec<JsonValue>>,
    pub description: Option<String>,
    pub nullable: bool,
    pub indexed: bool,
    pub unique: bool,
    pub hidden_in_list: bool,
    pub hidden_in_detail: bool,
    pub entity: String,
    pub referenced_entity: Option<String>,
}

impl FieldSchema {
    /// Display name, preferring `pretty_name` over `display_name` over `name`
    pub fn display_label(&self) -> &str {
        [&self.pretty_name, &self.display_name]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }

    /// Whether the column starts hidden in list views
    pub fn is_hidden_initially(&self) -> bool {
        self.hidden_in_list
    }
}

/// All fields of an entity, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSchema>,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    /// Field names usable in filters and sorts
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}
