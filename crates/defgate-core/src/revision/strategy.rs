//! Pluggable revision derivation and comparison.
//!
//! The guard only needs two capabilities from the object model: turn a
//! candidate into the revision it would produce, and decide whether two
//! revisions are the same. Both are traits so the guard can be exercised
//! without a full object model; [`SpecDigestGatherer`] and
//! [`SpecComparator`] are the defaults.

use defgate_state::DefinitionRevision;
use serde_json::json;

use crate::domain::{canonical_json, compute_digest, CandidateDefinition, GatherError};

/// A derived revision plus the canonical text that was hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionInfo {
    pub revision: DefinitionRevision,
    pub canonical_spec: String,
}

/// Derives the revision a candidate would be stored as.
pub trait RevisionGatherer: Send + Sync {
    fn gather(&self, definition: &CandidateDefinition) -> Result<RevisionInfo, GatherError>;
}

/// Decides whether two revisions snapshot the same definition.
pub trait RevisionComparator: Send + Sync {
    fn deep_equal(&self, stored: &DefinitionRevision, derived: &DefinitionRevision) -> bool;
}

/// Hashes `{kind, spec}` in canonical form.
///
/// The derived revision carries the candidate's identity and an unassigned
/// revision number (0); numbering belongs to the controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecDigestGatherer;

impl RevisionGatherer for SpecDigestGatherer {
    fn gather(&self, definition: &CandidateDefinition) -> Result<RevisionInfo, GatherError> {
        if !definition.spec.is_object() {
            return Err(GatherError::MissingSpec {
                name: definition.name.clone(),
            });
        }

        let revision_hash = compute_digest(&json!({
            "kind": definition.kind,
            "spec": definition.spec,
        }))?;
        let canonical_spec = canonical_json(&definition.spec)?;

        Ok(RevisionInfo {
            revision: DefinitionRevision {
                namespace: definition.namespace.clone(),
                name: definition.name.clone(),
                revision: 0,
                revision_hash,
                definition_kind: definition.kind,
                definition: definition.spec.clone(),
                created_at: None,
            },
            canonical_spec,
        })
    }
}

/// Equal when kind and canonical spec match. Identity, revision number and
/// timestamps are not significant.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecComparator;

impl RevisionComparator for SpecComparator {
    fn deep_equal(&self, stored: &DefinitionRevision, derived: &DefinitionRevision) -> bool {
        if stored.definition_kind != derived.definition_kind {
            return false;
        }
        match (
            canonical_json(&stored.definition),
            canonical_json(&derived.definition),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}
