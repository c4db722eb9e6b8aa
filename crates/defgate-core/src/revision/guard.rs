use std::sync::Arc;

use defgate_state::{NamespacedName, RevisionStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::error::{RevisionError, SpecDrift};
use super::qualified_name::is_qualified_name;
use super::strategy::{RevisionComparator, RevisionGatherer, SpecComparator, SpecDigestGatherer};
use crate::domain::CandidateDefinition;

/// Rejects candidates that would rewrite an already-published revision.
///
/// One store read per call, no writes. Two concurrent publishes of the
/// same revision name race; closing that belongs to the store layer.
#[derive(Clone)]
pub struct RevisionImmutabilityGuard {
    store: Arc<dyn RevisionStore>,
    gatherer: Arc<dyn RevisionGatherer>,
    comparator: Arc<dyn RevisionComparator>,
}

impl RevisionImmutabilityGuard {
    /// Guard using [`SpecDigestGatherer`] and [`SpecComparator`].
    pub fn new(store: Arc<dyn RevisionStore>) -> Self {
        Self::with_strategies(store, Arc::new(SpecDigestGatherer), Arc::new(SpecComparator))
    }

    pub fn with_strategies(
        store: Arc<dyn RevisionStore>,
        gatherer: Arc<dyn RevisionGatherer>,
        comparator: Arc<dyn RevisionComparator>,
    ) -> Self {
        Self {
            store,
            gatherer,
            comparator,
        }
    }

    /// Check `definition` against the revision stored at `key`.
    ///
    /// # Errors
    ///
    /// - `RevisionError::InvalidName`: `key.name` is not a qualified name;
    ///   the store is not consulted.
    /// - `RevisionError::Storage`: the lookup failed for a reason other
    ///   than the revision being absent.
    /// - `RevisionError::Cancelled`: `cancel` fired during the lookup.
    /// - `RevisionError::Gather`: the candidate's revision could not be
    ///   derived.
    /// - `RevisionError::SpecChanged`: hash or payload differs from the
    ///   stored revision.
    #[instrument(skip_all, fields(revision = %key, kind = %definition.kind))]
    pub async fn validate(
        &self,
        definition: &CandidateDefinition,
        key: &NamespacedName,
        cancel: &CancellationToken,
    ) -> Result<(), RevisionError> {
        let violations = is_qualified_name(&key.name);
        if !violations.is_empty() {
            return Err(RevisionError::InvalidName {
                name: key.name.clone(),
                violations,
            });
        }

        let lookup = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RevisionError::Cancelled),
            lookup = self.store.get_revision(key) => lookup,
        };
        let stored = match lookup {
            Ok(stored) => stored,
            Err(e) if e.is_not_found() => {
                debug!("no published revision, nothing to protect");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let derived = self.gatherer.gather(definition)?.revision;

        if stored.revision_hash != derived.revision_hash {
            warn!(
                stored = %stored.revision_hash,
                derived = %derived.revision_hash,
                "revision hash drift"
            );
            return Err(RevisionError::SpecChanged {
                drift: SpecDrift::Hash {
                    stored: stored.revision_hash,
                    derived: derived.revision_hash,
                },
            });
        }
        if !self.comparator.deep_equal(&stored, &derived) {
            warn!("revision payload drift under matching hash");
            return Err(RevisionError::SpecChanged {
                drift: SpecDrift::Payload,
            });
        }

        Ok(())
    }
}
