//! Error types for defgate-state

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by a [`RevisionStore`](crate::RevisionStore).
///
/// `NotFound` is the only variant admission treats as benign; everything
/// else is an infrastructure failure and must reach the caller unchanged.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No revision is stored under the requested key
    #[error("definitionRevision not found: {key}")]
    NotFound { key: String },

    /// The key cannot address a record in this store
    #[error("invalid definitionRevision key {key}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// The backing store failed (connectivity, timeouts, permissions)
    #[error("revision store backend failed: {0}")]
    Backend(String),

    /// A stored record could not be decoded
    #[error("failed to decode definitionRevision {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem error while reading a stored record
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Whether this error only says the key is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}
