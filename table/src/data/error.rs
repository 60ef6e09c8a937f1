//! Error type for record sources

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// Entity or record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream returned a non-success status or an unexpected body
    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON payload
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation not supported by this source
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A bulk delete stopped at this record
    #[error("Failed to delete record {id}: {source}")]
    DeleteFailed {
        id: String,
        #[source]
        source: Box<DataError>,
    },
}

impl DataError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }
}
