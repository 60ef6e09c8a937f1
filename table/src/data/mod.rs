//! Data access layer
//!
//! Record sources deliver entity schemas and rows:
//! - `file` - JSON files in a local data directory
//! - `api` - the CRUD REST API
//! - `traits` - the `RecordSource` trait both implement
//! - `error` - error type shared by all sources

pub mod api;
pub mod error;
pub mod file;
pub mod traits;

pub use api::ApiSource;
pub use error::DataError;
pub use file::FileSource;
pub use traits::{ListParams, RecordSource};

use std::sync::Arc;

use crate::core::config::{AppConfig, SourceKind};

/// Open the record source selected by configuration
pub fn open_source(config: &AppConfig) -> Result<Arc<dyn RecordSource>, DataError> {
    let source: Arc<dyn RecordSource> = match config.source.kind {
        SourceKind::File => Arc::new(FileSource::new(config.source.data_dir.clone())),
        SourceKind::Api => Arc::new(ApiSource::new(
            &config.api.url,
            config.api.timeout_secs,
            config.api.cookie.as_deref(),
        )?),
    };
    tracing::debug!(source = source.name(), "Record source opened");
    Ok(source)
}

/// Entity names end up in file names and URL paths, so only plain
/// identifiers are accepted
pub(crate) fn validate_entity(entity: &str) -> Result<(), DataError> {
    let valid = !entity.is_empty()
        && entity
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(DataError::NotFound(format!("entity '{}'", entity)));
    }
    Ok(())
}
