//! CUE template validation.
//!
//! Templates are compiled through an external constraint-language
//! compiler and then run through its validation pass. References to the
//! `context` object are expected to be unresolved at admission time: the
//! runtime injects `context` later, so exactly that diagnostic is dropped
//! and everything else rejects the template.
//!
//! The evaluator is not implemented here. [`Compiler`] covers hermetic
//! per-call compilation and [`SharedCompiler`] covers a long-lived,
//! concurrency-safe instance that may resolve references asynchronously.

mod compiler;
mod diagnostics;
mod error;
pub mod fakes;
mod validator;

pub use compiler::{CompileOptions, CompiledValue, Compiler, SharedCompiler};
pub use diagnostics::{check_diagnostics, is_deferred_context_reference, Diagnostic};
pub use error::{CompilerError, TemplateError};
pub use validator::{ContextTemplateValidator, TemplateValidator};
