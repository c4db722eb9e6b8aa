//! Storage trait definitions for defgate
//!
//! Admission needs a single capability from persistence: look up a stored
//! `DefinitionRevision` by its namespaced name. Writes belong to the
//! controller and are not modelled here.
//!
//! In-memory fakes are provided for testing via the `fakes` module.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::schema::{DefinitionRevision, NamespacedName};

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Read-only revision store.
///
/// Guarantees:
/// - An absent key yields `StorageError::NotFound`, never another variant.
/// - Any other failure is reported as-is so callers can decide to retry.
/// - Implementations are safe to call concurrently.
#[async_trait]
pub trait RevisionStore: Send + Sync {
    /// Fetch the revision stored under `key`.
    async fn get_revision(&self, key: &NamespacedName) -> StorageResult<DefinitionRevision>;
}
