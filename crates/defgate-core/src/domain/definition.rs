//! The definition object submitted for admission.

use std::collections::BTreeMap;

use defgate_state::{DefinitionKind, NamespacedName};
use serde::{Deserialize, Serialize};

/// Annotation that pins a definition to an explicit revision name.
pub const REVISION_NAME_ANNOTATION: &str = "definitionrevision.oam.dev/name";

/// A candidate definition (component, trait, policy, workflow step).
///
/// Borrowed by validators for the duration of one call; nothing retains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDefinition {
    pub kind: DefinitionKind,
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Definition spec, including the optional `version` and the
    /// `schematic.cue.template` body.
    pub spec: serde_json::Value,
}

impl CandidateDefinition {
    pub fn new(
        kind: DefinitionKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
        spec: serde_json::Value,
    ) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
            annotations: BTreeMap::new(),
            spec,
        }
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// `spec.version`, or `""` when unset.
    pub fn version(&self) -> &str {
        self.spec
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }

    /// Revision name pinned through [`REVISION_NAME_ANNOTATION`], or `""`.
    pub fn revision_name(&self) -> &str {
        self.revision_name_at(REVISION_NAME_ANNOTATION)
    }

    /// Revision name pinned through a caller-chosen annotation key, or `""`.
    pub fn revision_name_at(&self, annotation: &str) -> &str {
        self.annotations
            .get(annotation)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Embedded CUE template body (`spec.schematic.cue.template`).
    pub fn template(&self) -> Option<&str> {
        self.spec
            .pointer("/schematic/cue/template")
            .and_then(|v| v.as_str())
    }

    /// Key of the revision this definition is pinned to, if any.
    ///
    /// The pin is the annotated revision name when present, otherwise
    /// `spec.version`; the stored revision is named `{name}-v{pin}`.
    pub fn pinned_revision_key(&self, annotation: &str) -> Option<NamespacedName> {
        let pin = match self.revision_name_at(annotation) {
            "" => self.version(),
            name => name,
        };
        if pin.is_empty() {
            return None;
        }
        Some(NamespacedName::new(
            &self.namespace,
            format!("{}-v{}", self.name, pin),
        ))
    }
}
