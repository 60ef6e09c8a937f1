//! JSON file record source
//!
//! Reads entities from a data directory:
//! `{data_dir}/{entity}.json` holds an array of rows and
//! `{data_dir}/{entity}.schema.json` holds the entity schema.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::fs;

use crate::domain::filter::{Row, matches_search};
use crate::domain::schema::EntitySchema;

use super::error::DataError;
use super::traits::{ListParams, RecordSource};
use super::validate_entity;

#[derive(Debug, Clone)]
pub struct FileSource {
    data_dir: PathBuf,
}

impl FileSource {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn rows_path(&self, entity: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", entity))
    }

    fn schema_path(&self, entity: &str) -> PathBuf {
        self.data_dir.join(format!("{}.schema.json", entity))
    }

    async fn read_json<T: DeserializeOwned>(path: &Path, entity: &str) -> Result<T, DataError> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DataError::NotFound(format!("entity '{}' ({})", entity, path.display()))
            } else {
                DataError::Io(e)
            }
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn load_rows(&self, entity: &str) -> Result<Vec<Row>, DataError> {
        validate_entity(entity)?;
        let path = self.rows_path(entity);
        let rows: Vec<Row> = Self::read_json(&path, entity).await?;
        tracing::debug!(entity, rows = rows.len(), path = %path.display(), "Loaded records");
        Ok(rows)
    }
}

#[async_trait]
impl RecordSource for FileSource {
    async fn entity_schema(&self, entity: &str) -> Result<EntitySchema, DataError> {
        validate_entity(entity)?;
        let mut schema: EntitySchema = Self::read_json(&self.schema_path(entity), entity).await?;
        if schema.name.is_empty() {
            schema.name = entity.to_string();
        }
        Ok(schema)
    }

    async fn list_records(
        &self,
        entity: &str,
        params: &ListParams,
    ) -> Result<Vec<Row>, DataError> {
        let rows = self.load_rows(entity).await?;
        let search = params.search.as_deref().unwrap_or("");
        let skip = usize::try_from(params.skip).unwrap_or(usize::MAX);
        let limit = params
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(rows
            .into_iter()
            .filter(|row| matches_search(row, search))
            .skip(skip)
            .take(limit)
            .collect())
    }

    async fn count(&self, entity: &str) -> Result<u64, DataError> {
        Ok(self.load_rows(entity).await?.len() as u64)
    }

    async fn delete_record(&self, entity: &str, id: &str) -> Result<(), DataError> {
        tracing::debug!(entity, id, "Delete requested on read-only file source");
        Err(DataError::NotImplemented(
            "file source is read-only; deleting records requires the API source".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, FileSource) {
        let temp_dir = TempDir::new().unwrap();
        let rows = json!([
            {"id": 1, "hostname": "DC01", "os": "Windows"},
            {"id": 2, "hostname": "web01", "os": "Linux"},
            {"id": 3, "hostname": "db01", "os": "Linux"}
        ]);
        let schema = json!({
            "fields": {
                "hostname": {"name": "hostname", "annotation": "<class 'str'>"},
                "os": {"name": "os", "annotation": "<class 'str'>", "choices": ["Windows", "Linux"]}
            }
        });
        fs::write(temp_dir.path().join("host.json"), rows.to_string())
            .await
            .unwrap();
        fs::write(temp_dir.path().join("host.schema.json"), schema.to_string())
            .await
            .unwrap();
        let source = FileSource::new(temp_dir.path().to_path_buf());
        (temp_dir, source)
    }

    #[tokio::test]
    async fn test_list_all_records() {
        let (_dir, source) = setup().await;
        let rows = source
            .list_records("host", &ListParams::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["hostname"], "DC01");
    }

    #[tokio::test]
    async fn test_list_with_search_and_paging() {
        let (_dir, source) = setup().await;
        let params = ListParams {
            skip: 1,
            limit: Some(5),
            search: Some("linux".to_string()),
        };
        let rows = source.list_records("host", &params).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 3);
    }

    #[tokio::test]
    async fn test_schema_name_defaults_to_entity() {
        let (_dir, source) = setup().await;
        let schema = source.entity_schema("host").await.unwrap();
        assert_eq!(schema.name, "host");
        assert_eq!(schema.fields.len(), 2);
    }

    #[tokio::test]
    async fn test_count() {
        let (_dir, source) = setup().await;
        assert_eq!(source.count("host").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_missing_entity_is_not_found() {
        let (_dir, source) = setup().await;
        let err = source
            .list_records("vuln", &ListParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_path_like_entity_rejected() {
        let (_dir, source) = setup().await;
        let err = source.entity_schema("../host").await.unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_invalid_rows_file() {
        let (dir, source) = setup().await;
        fs::write(dir.path().join("broken.json"), r#"{"not": "an array"}"#)
            .await
            .unwrap();
        let err = source.count("broken").await.unwrap_err();
        assert!(matches!(err, DataError::Json(_)));
    }

    #[tokio::test]
    async fn test_delete_not_implemented() {
        let (_dir, source) = setup().await;
        let err = source.delete_record("host", "1").await.unwrap_err();
        assert!(matches!(err, DataError::NotImplemented(_)));
    }
}
