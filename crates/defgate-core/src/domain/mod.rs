//! Domain models for defgate.
//!
//! - `CandidateDefinition`: the object under admission
//! - `digest`: canonical JSON and content hashing for revisions
//! - `error`: the umbrella error taxonomy

pub mod definition;
pub mod digest;
pub mod error;

pub use definition::{CandidateDefinition, REVISION_NAME_ANNOTATION};
pub use digest::{canonical_json, compute_digest};
pub use error::{DigestError, GateError, GatherError, Result};
