use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::error::TemplateError;

/// Anchored match for an unresolved `context` reference. Must stay exact:
/// a looser match would swallow unrelated errors that mention "context".
static CONTEXT_NOT_FOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\S+: reference "context" not found$"#).expect("context pattern compiles")
});

/// A single compiler diagnostic, reduced to its rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Diagnostic {
    message: String,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&str> for Diagnostic {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Diagnostic {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Whether `message` is exactly `<path>: reference "context" not found`.
pub fn is_deferred_context_reference(message: &str) -> bool {
    CONTEXT_NOT_FOUND.is_match(message)
}

/// Reject if any diagnostic is not a deferred `context` reference.
///
/// All offending messages are reported, sorted and de-duplicated, so the
/// first one is stable regardless of the order the compiler produced them.
pub fn check_diagnostics(diagnostics: &[Diagnostic]) -> Result<(), TemplateError> {
    let mut offending: Vec<String> = Vec::new();
    let mut suppressed = 0usize;

    for diagnostic in diagnostics {
        if is_deferred_context_reference(diagnostic.message()) {
            suppressed += 1;
        } else {
            offending.push(diagnostic.message().to_string());
        }
    }

    if suppressed > 0 {
        debug!(suppressed, "ignoring deferred context references");
    }
    if offending.is_empty() {
        return Ok(());
    }

    offending.sort();
    offending.dedup();
    warn!(count = offending.len(), first = %offending[0], "template rejected");
    Err(TemplateError::Invalid {
        diagnostics: offending,
    })
}
