//! Record shapes for stored definition revisions
//!
//! - `NamespacedName`: lookup key into a revision store
//! - `DefinitionKind`: which definition family a revision snapshots
//! - `DefinitionRevision`: the immutable snapshot itself

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Namespace-qualified object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespacedName {
    pub namespace: String,
    pub name: String,
}

impl NamespacedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

/// Definition families that can be revisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefinitionKind {
    ComponentDefinition,
    TraitDefinition,
    PolicyDefinition,
    WorkflowStepDefinition,
}

impl DefinitionKind {
    /// Object type label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            DefinitionKind::ComponentDefinition => "ComponentDefinition",
            DefinitionKind::TraitDefinition => "TraitDefinition",
            DefinitionKind::PolicyDefinition => "PolicyDefinition",
            DefinitionKind::WorkflowStepDefinition => "WorkflowStepDefinition",
        }
    }

    /// Workflow steps resolve provider references at compile time, so their
    /// templates go through the shared context-aware compiler.
    pub fn uses_context_compiler(&self) -> bool {
        matches!(self, DefinitionKind::WorkflowStepDefinition)
    }
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable snapshot of a definition spec.
///
/// Once persisted, neither `revision_hash` nor `definition` may change.
/// A spec change produces a new revision under a new name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionRevision {
    pub namespace: String,
    pub name: String,
    /// Monotonic revision number assigned by the controller (0 if unassigned)
    #[serde(default)]
    pub revision: i64,
    /// Content hash of the snapshotted spec
    pub revision_hash: String,
    pub definition_kind: DefinitionKind,
    /// The full definition spec this revision snapshots
    pub definition: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DefinitionRevision {
    pub fn key(&self) -> NamespacedName {
        NamespacedName::new(&self.namespace, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaced_name_display() {
        assert_eq!(
            NamespacedName::new("vela-system", "webservice-v1").to_string(),
            "vela-system/webservice-v1"
        );
        assert_eq!(NamespacedName::new("", "scaler-v2").to_string(), "scaler-v2");
    }

    #[test]
    fn only_workflow_steps_use_context_compiler() {
        assert!(DefinitionKind::WorkflowStepDefinition.uses_context_compiler());
        assert!(!DefinitionKind::TraitDefinition.uses_context_compiler());
        assert!(!DefinitionKind::ComponentDefinition.uses_context_compiler());
        assert!(!DefinitionKind::PolicyDefinition.uses_context_compiler());
    }

    #[test]
    fn revision_decodes_without_optional_fields() {
        let rev: DefinitionRevision = serde_json::from_value(serde_json::json!({
            "namespace": "vela-system",
            "name": "scaler-v1",
            "revision_hash": "abc",
            "definition_kind": "TraitDefinition",
            "definition": { "version": "1.0.0" }
        }))
        .unwrap();
        assert_eq!(rev.revision, 0);
        assert!(rev.created_at.is_none());
        assert_eq!(rev.key(), NamespacedName::new("vela-system", "scaler-v1"));
    }
}
