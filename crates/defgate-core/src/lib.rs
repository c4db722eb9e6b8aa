//! defgate Core Library
//!
//! Admission-time validators for capability definitions. Each validator is
//! independent and stateless; callers compose them.
//!
//! - [`version`]: version string format and single-pin checks
//! - [`template`]: CUE template compilation with deferred-context filtering
//! - [`revision`]: immutability of published definition revisions

pub mod config;
pub mod domain;
pub mod revision;
pub mod telemetry;
pub mod template;
pub mod version;

pub use config::{ConfigError, GateConfig};

pub use domain::{
    canonical_json, compute_digest, CandidateDefinition, DigestError, GateError, GatherError,
    Result, REVISION_NAME_ANNOTATION,
};

pub use revision::{
    is_qualified_name, RevisionComparator, RevisionError, RevisionGatherer,
    RevisionImmutabilityGuard, RevisionInfo, SpecComparator, SpecDigestGatherer, SpecDrift,
};

pub use template::{
    check_diagnostics, is_deferred_context_reference, CompileOptions, CompiledValue, Compiler,
    CompilerError, ContextTemplateValidator, Diagnostic, SharedCompiler, TemplateError,
    TemplateValidator,
};

pub use version::{validate_semantic_version, validate_single_version_pin, VersionError};

pub use defgate_state::{DefinitionKind, DefinitionRevision, NamespacedName, RevisionStore};

pub use telemetry::init_tracing;

/// defgate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
