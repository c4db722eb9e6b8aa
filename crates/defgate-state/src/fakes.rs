//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryRevisionStore` and `FailingRevisionStore` that satisfy the
//! `RevisionStore` contract without any external dependencies.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::schema::{DefinitionRevision, NamespacedName};
use crate::storage_traits::*;

// ---------------------------------------------------------------------------
// MemoryRevisionStore
// ---------------------------------------------------------------------------

/// In-memory revision store backed by a `HashMap<NamespacedName, DefinitionRevision>`.
///
/// Counts every `get_revision` call so tests can assert whether the store
/// was consulted at all.
#[derive(Debug, Default)]
pub struct MemoryRevisionStore {
    revisions: Mutex<HashMap<NamespacedName, DefinitionRevision>>,
    reads: AtomicUsize,
}

impl MemoryRevisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a revision under its own key.
    pub fn insert(&self, revision: DefinitionRevision) {
        let mut revisions = self.revisions.lock().unwrap();
        revisions.insert(revision.key(), revision);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_revision(self, revision: DefinitionRevision) -> Self {
        self.insert(revision);
        self
    }

    /// Number of lookups served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RevisionStore for MemoryRevisionStore {
    async fn get_revision(&self, key: &NamespacedName) -> StorageResult<DefinitionRevision> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let revisions = self.revisions.lock().unwrap();
        revisions
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// FailingRevisionStore
// ---------------------------------------------------------------------------

/// Store whose every lookup fails with `StorageError::Backend`.
#[derive(Debug, Clone)]
pub struct FailingRevisionStore {
    message: String,
}

impl FailingRevisionStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl RevisionStore for FailingRevisionStore {
    async fn get_revision(&self, _key: &NamespacedName) -> StorageResult<DefinitionRevision> {
        Err(StorageError::Backend(self.message.clone()))
    }
}

// ---------------------------------------------------------------------------
// PendingRevisionStore
// ---------------------------------------------------------------------------

/// Store whose lookups never complete. Used to exercise cancellation.
#[derive(Debug, Default, Clone)]
pub struct PendingRevisionStore;

#[async_trait]
impl RevisionStore for PendingRevisionStore {
    async fn get_revision(&self, _key: &NamespacedName) -> StorageResult<DefinitionRevision> {
        std::future::pending().await
    }
}
