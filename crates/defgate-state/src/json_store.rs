//! Revision store over a directory of exported JSON records.
//!
//! Layout: `{root}/{namespace}/{name}.json`, or `{root}/{name}.json` for
//! cluster-scoped keys (empty namespace). Namespace and name must each be a
//! single plain path segment, so every lookup stays under `root`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::error::StorageError;
use crate::schema::{DefinitionRevision, NamespacedName};
use crate::storage_traits::{RevisionStore, StorageResult};

/// Read-only `RevisionStore` backed by JSON files.
#[derive(Debug, Clone)]
pub struct JsonDirRevisionStore {
    root: PathBuf,
}

impl JsonDirRevisionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &NamespacedName) -> StorageResult<PathBuf> {
        let invalid = |reason: &str| StorageError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        if !is_plain_segment(&key.name) {
            return Err(invalid("name must be a single path segment"));
        }
        let file = format!("{}.json", key.name);
        if key.namespace.is_empty() {
            return Ok(self.root.join(file));
        }
        if !is_plain_segment(&key.namespace) {
            return Err(invalid("namespace must be a single path segment"));
        }
        Ok(self.root.join(&key.namespace).join(file))
    }
}

/// Exactly one `Component::Normal`: no separators, roots, or `.`/`..`.
fn is_plain_segment(part: &str) -> bool {
    if part.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(part).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[async_trait]
impl RevisionStore for JsonDirRevisionStore {
    #[instrument(skip(self, key), fields(revision = %key))]
    async fn get_revision(&self, key: &NamespacedName) -> StorageResult<DefinitionRevision> {
        let path = self.path_for(key).inspect_err(|e| warn!(error = %e, "rejected key"))?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no stored revision");
                return Err(StorageError::NotFound {
                    key: key.to_string(),
                });
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Decode {
            key: key.to_string(),
            source,
        })
    }
}
