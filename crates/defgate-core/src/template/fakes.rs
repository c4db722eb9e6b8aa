//! Scripted compilers for tests (no evaluator behind them).
//!
//! `ScriptedCompiler` maps template sources to canned diagnostics;
//! `ScriptedSharedCompiler` wraps it behind the async `SharedCompiler`
//! interface with optional latency and failure injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::compiler::{CompileOptions, CompiledValue, Compiler, SharedCompiler};
use super::diagnostics::Diagnostic;
use super::error::CompilerError;

/// Canned compile and validate diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedValue {
    compile: Vec<Diagnostic>,
    validate: Vec<Diagnostic>,
}

impl ScriptedValue {
    /// A value with no diagnostics at all.
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn with_compile_error(mut self, message: impl Into<String>) -> Self {
        self.compile.push(Diagnostic::new(message));
        self
    }

    pub fn with_validate_error(mut self, message: impl Into<String>) -> Self {
        self.validate.push(Diagnostic::new(message));
        self
    }
}

impl CompiledValue for ScriptedValue {
    fn err(&self) -> Vec<Diagnostic> {
        self.compile.clone()
    }

    fn validate(&self) -> Vec<Diagnostic> {
        self.validate.clone()
    }
}

/// Compiler answering from a source → value script. Unscripted sources
/// compile cleanly.
#[derive(Debug, Default)]
pub struct ScriptedCompiler {
    scripts: HashMap<String, ScriptedValue>,
    compiles: AtomicUsize,
}

impl ScriptedCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, source: impl Into<String>, value: ScriptedValue) -> Self {
        self.scripts.insert(source.into(), value);
        self
    }

    /// Number of compiles performed.
    pub fn compiles(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }
}

impl Compiler for ScriptedCompiler {
    type Value = ScriptedValue;

    fn compile(&self, source: &str) -> ScriptedValue {
        self.compiles.fetch_add(1, Ordering::SeqCst);
        self.scripts.get(source).cloned().unwrap_or_default()
    }
}

/// `SharedCompiler` over a [`ScriptedCompiler`].
#[derive(Debug, Default)]
pub struct ScriptedSharedCompiler {
    inner: ScriptedCompiler,
    latency: Option<Duration>,
    failure: Option<String>,
    seen_options: std::sync::Mutex<Vec<CompileOptions>>,
}

impl ScriptedSharedCompiler {
    pub fn new(inner: ScriptedCompiler) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Sleep for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fail every compile with a `CompilerError`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn compiles(&self) -> usize {
        self.inner.compiles()
    }

    /// Options received by each compile, in call order.
    pub fn seen_options(&self) -> Vec<CompileOptions> {
        self.seen_options.lock().unwrap().clone()
    }
}

#[async_trait]
impl SharedCompiler for ScriptedSharedCompiler {
    async fn compile(
        &self,
        source: &str,
        options: &CompileOptions,
    ) -> Result<Box<dyn CompiledValue>, CompilerError> {
        self.seen_options.lock().unwrap().push(options.clone());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(message) = &self.failure {
            return Err(CompilerError::new(message.clone()));
        }
        Ok(Box::new(self.inner.compile(source)))
    }
}
