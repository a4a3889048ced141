//! Error types for the package index.

use std::io;

use thiserror::Error;

use crate::version::VersionError;

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur while loading, querying or persisting an index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A required argument was missing or blank.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The persisted document does not match the index schema.
    #[error("invalid package index: {0}")]
    DataFormat(String),

    /// A version string in the persisted document failed to parse.
    #[error("invalid version '{value}' for {id} in package index: {source}")]
    InvalidVersion {
        id: String,
        value: String,
        #[source]
        source: VersionError,
    },

    /// The persisted document is not valid JSON.
    #[error("failed to parse {location}: {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to read the persisted document.
    #[error("failed to read {location}: {source}")]
    ReadFailed {
        location: String,
        #[source]
        source: io::Error,
    },

    /// Failed to write or delete the persisted document.
    #[error("failed to write {location}: {source}")]
    WriteFailed {
        location: String,
        #[source]
        source: io::Error,
    },

    /// The operation was cancelled at an I/O boundary.
    #[error("index operation cancelled")]
    Cancelled,
}

impl IndexError {
    /// True for errors raised while reading an existing document.
    pub fn is_read_failure(&self) -> bool {
        matches!(
            self,
            IndexError::DataFormat(_)
                | IndexError::InvalidVersion { .. }
                | IndexError::Json { .. }
                | IndexError::ReadFailed { .. }
        )
    }
}
