use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::compiler::{CompileOptions, CompiledValue, Compiler, SharedCompiler};
use super::diagnostics::check_diagnostics;
use super::error::{CompilerError, TemplateError};

/// Compile-time diagnostics first; the validation pass only runs on a value
/// that built cleanly (modulo deferred `context` references).
fn check_value(value: &dyn CompiledValue) -> Result<(), TemplateError> {
    check_diagnostics(&value.err())?;
    check_diagnostics(&value.validate())
}

/// Validates templates with a hermetic, per-call compiler.
#[derive(Debug, Clone, Default)]
pub struct TemplateValidator<C> {
    compiler: C,
}

impl<C: Compiler> TemplateValidator<C> {
    pub fn new(compiler: C) -> Self {
        Self { compiler }
    }

    #[instrument(skip_all, fields(template_len = template.len()))]
    pub fn validate(&self, template: &str) -> Result<(), TemplateError> {
        let value = self.compiler.compile(template);
        check_value(&value)
    }
}

/// Validates templates through a shared, context-aware compiler.
///
/// The compiler is injected at construction; clones share it.
#[derive(Clone)]
pub struct ContextTemplateValidator {
    compiler: Arc<dyn SharedCompiler>,
    options: CompileOptions,
}

impl ContextTemplateValidator {
    pub fn new(compiler: Arc<dyn SharedCompiler>) -> Self {
        Self {
            compiler,
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile and validate `template`.
    ///
    /// Returns `TemplateError::Cancelled` as soon as `cancel` fires, and
    /// `TemplateError::Timeout` when `options.timeout` elapses first.
    #[instrument(skip_all, fields(template_len = template.len()))]
    pub async fn validate(
        &self,
        template: &str,
        cancel: &CancellationToken,
    ) -> Result<(), TemplateError> {
        let compile = self.compiler.compile(template, &self.options);
        let value = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TemplateError::Cancelled),
            result = within(self.options.timeout, compile) => result?,
        };
        check_value(value.as_ref())
    }
}

async fn within<F, T>(timeout: Option<Duration>, fut: F) -> Result<T, TemplateError>
where
    F: Future<Output = Result<T, CompilerError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| TemplateError::Timeout(limit))?
            .map_err(TemplateError::from),
        None => fut.await.map_err(TemplateError::from),
    }
}
