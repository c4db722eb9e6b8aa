use defgate_state::StorageError;

use crate::domain::GatherError;

/// Which comparison rejected the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecDrift {
    /// Stored and derived revision hashes differ.
    Hash { stored: String, derived: String },
    /// Hashes agree but the comparator found a significant difference.
    Payload,
}

/// Errors from the revision immutability guard.
#[derive(Debug, thiserror::Error)]
pub enum RevisionError {
    #[error("invalid definitionRevision name {name}:{}", .violations.join(","))]
    InvalidName {
        name: String,
        violations: Vec<String>,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Gather(#[from] GatherError),

    #[error("the definition's spec is different with existing definitionRevision's spec")]
    SpecChanged { drift: SpecDrift },

    #[error("definitionRevision lookup cancelled")]
    Cancelled,
}

impl RevisionError {
    /// True for store failures and cancellation. A key the store refuses
    /// to address is the candidate's fault, not the store's.
    pub fn is_infrastructure(&self) -> bool {
        match self {
            RevisionError::Storage(StorageError::InvalidKey { .. }) => false,
            RevisionError::Storage(_) | RevisionError::Cancelled => true,
            _ => false,
        }
    }
}
