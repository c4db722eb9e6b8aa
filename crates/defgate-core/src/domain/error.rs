//! Domain-level error taxonomy for defgate.
//!
//! Four classes reach callers: input-format errors ([`VersionError`],
//! malformed revision names), template-evaluation errors
//! ([`TemplateError::Invalid`]), infrastructure errors (store, compiler,
//! cancellation) and immutability violations ([`RevisionError::SpecChanged`]).
//! Only infrastructure errors are worth retrying; see
//! [`GateError::is_infrastructure`].

use crate::revision::RevisionError;
use crate::template::TemplateError;
use crate::version::VersionError;

/// Errors produced while canonicalizing a spec for hashing.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("NaN/Infinity not permitted in canonical JSON")]
    NonFiniteNumber,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from deriving a would-be revision out of a candidate definition.
#[derive(Debug, thiserror::Error)]
pub enum GatherError {
    #[error("definition {name} has no spec object")]
    MissingSpec { name: String },

    #[error("failed to hash definition spec: {0}")]
    Digest(#[from] DigestError),

    /// Failure inside a caller-supplied [`RevisionGatherer`](crate::RevisionGatherer),
    /// such as an object model that cannot render the candidate.
    #[error("{0}")]
    Other(String),
}

/// Umbrella error for callers composing several validators.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Revision(#[from] RevisionError),
}

impl GateError {
    /// True when the failure came from a collaborator rather than from the
    /// candidate itself.
    pub fn is_infrastructure(&self) -> bool {
        match self {
            GateError::Version(_) => false,
            GateError::Template(e) => e.is_infrastructure(),
            GateError::Revision(e) => e.is_infrastructure(),
        }
    }
}

/// Result type for defgate validations.
pub type Result<T> = std::result::Result<T, GateError>;
