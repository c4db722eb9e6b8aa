//! Immutability of published definition revisions.
//!
//! A `DefinitionRevision` is never rewritten once stored. Before a
//! definition is admitted, [`RevisionImmutabilityGuard`] re-derives the
//! revision the candidate would produce and rejects it when that differs
//! from what is already stored under the same name.

mod error;
mod guard;
mod qualified_name;
mod strategy;

pub use error::{RevisionError, SpecDrift};
pub use guard::RevisionImmutabilityGuard;
pub use qualified_name::is_qualified_name;
pub use strategy::{
    RevisionComparator, RevisionGatherer, RevisionInfo, SpecComparator, SpecDigestGatherer,
};
