use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the record store
///
/// Only `NotFound` is a client error; every other variant means the source
/// file could not be served and maps to an internal error at the HTTP edge.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No record with id {id}")]
    NotFound { id: String },

    #[error("Failed to read source file {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed source file {}: {reason}", .path.display())]
    MalformedSource { path: PathBuf, reason: String },

    #[error("Record {id} on line {line} in {} could not be decoded: {source}", .path.display())]
    MalformedRecord {
        id: String,
        line: usize,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Timed out after {after:?} reading {}", .path.display())]
    Timeout { path: PathBuf, after: Duration },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
