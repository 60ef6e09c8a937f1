//! Record source trait
//!
//! A record source serves the schema and rows of an entity. Rows are
//! loaded before any filtering happens; evaluation itself never awaits.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::domain::filter::Row;
use crate::domain::schema::EntitySchema;

/// Paging and server-side search for listing records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub skip: u64,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Schema of an entity
    async fn entity_schema(&self, entity: &str) -> Result<EntitySchema, DataError>;

    /// Records of an entity
    async fn list_records(&self, entity: &str, params: &ListParams)
    -> Result<Vec<Row>, DataError>;

    /// Total number of records of an entity
    async fn count(&self, entity: &str) -> Result<u64, DataError>;

    /// Delete one record by id
    async fn delete_record(&self, entity: &str, id: &str) -> Result<(), DataError>;

    /// Human-readable source name for logs
    fn name(&self) -> &'static str;
}
