//! defgate-state: revision store abstractions for defgate
//!
//! This crate owns the read side of definition revision persistence. The
//! controller that writes revisions lives elsewhere; admission only ever
//! needs a point-in-time lookup by namespaced name.
//!
//! ## Layer 0 - Data
//!
//! Focus: the `DefinitionRevision` record shape and a `RevisionStore` trait
//! whose "not found" outcome is distinguishable from every other failure.
//!
//! ## Key Components
//!
//! - `RevisionStore`: async fetch-by-name
//! - `DefinitionRevision`: immutable snapshot of a definition spec
//! - `JsonDirRevisionStore`: revisions exported as JSON files on disk
//! - `fakes`: in-memory stores for tests

mod error;
pub mod fakes;
mod json_store;
mod schema;
pub mod storage_traits;

pub use error::StorageError;
pub use json_store::JsonDirRevisionStore;
pub use schema::{DefinitionKind, DefinitionRevision, NamespacedName};
pub use storage_traits::{RevisionStore, StorageResult};
