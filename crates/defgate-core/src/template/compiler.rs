use std::time::Duration;

use async_trait::async_trait;

use super::diagnostics::Diagnostic;
use super::error::CompilerError;

/// A compiled template value.
pub trait CompiledValue: Send + Sync {
    /// Diagnostics recorded while building the value.
    fn err(&self) -> Vec<Diagnostic>;

    /// Run the evaluator's validation pass over the value.
    fn validate(&self) -> Vec<Diagnostic>;
}

/// Synchronous compiler.
///
/// Every `compile` call must use a fresh, isolated compilation context; no
/// state may leak between calls.
pub trait Compiler: Send + Sync {
    type Value: CompiledValue;

    fn compile(&self, source: &str) -> Self::Value;
}

/// Options passed through to a [`SharedCompiler`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Upper bound on a single compile, enforced by the validator.
    pub timeout: Option<Duration>,
    /// Whether the compiler should resolve provider/package references.
    /// Passed through unchanged; only the external compiler interprets it.
    pub resolve_references: bool,
}

impl CompileOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_reference_resolution(mut self) -> Self {
        self.resolve_references = true;
        self
    }
}

/// Long-lived compiler shared across callers.
///
/// Implementations must be safe for concurrent use. A compile may suspend
/// while references resolve; callers drop the future to cancel it.
#[async_trait]
pub trait SharedCompiler: Send + Sync {
    async fn compile(
        &self,
        source: &str,
        options: &CompileOptions,
    ) -> Result<Box<dyn CompiledValue>, CompilerError>;
}
