use std::time::Duration;

/// Failure of the compiler itself, as opposed to a diagnostic about the
/// template. Propagated to callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CompilerError(pub String);

impl CompilerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors from template validation.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template has at least one real diagnostic. Messages are sorted and
    /// de-duplicated so the report does not depend on compiler ordering.
    #[error("{}", .diagnostics.join("\n"))]
    Invalid { diagnostics: Vec<String> },

    #[error(transparent)]
    Compiler(#[from] CompilerError),

    #[error("template compilation cancelled")]
    Cancelled,

    #[error("template compilation timed out after {0:?}")]
    Timeout(Duration),
}

impl TemplateError {
    /// True for collaborator failures a caller may retry.
    pub fn is_infrastructure(&self) -> bool {
        !matches!(self, TemplateError::Invalid { .. })
    }

    /// Diagnostic messages that caused rejection (empty for infrastructure
    /// failures).
    pub fn diagnostics(&self) -> &[String] {
        match self {
            TemplateError::Invalid { diagnostics } => diagnostics,
            _ => &[],
        }
    }
}
