//! Runtime configuration for defgate callers.
//!
//! Defaults suit a stock installation. A JSON file may override them, and
//! `DEFGATE_*` environment variables override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::REVISION_NAME_ANNOTATION;
use crate::template::CompileOptions;

/// Environment variable overriding [`GateConfig::revision_name_annotation`].
pub const ENV_REVISION_ANNOTATION: &str = "DEFGATE_REVISION_ANNOTATION";
/// Environment variable overriding [`GateConfig::compile_timeout_ms`].
pub const ENV_COMPILE_TIMEOUT_MS: &str = "DEFGATE_COMPILE_TIMEOUT_MS";
/// Environment variable overriding [`GateConfig::store_dir`].
pub const ENV_STORE_DIR: &str = "DEFGATE_STORE_DIR";

/// Errors loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Annotation carrying an explicit revision-name pin.
    pub revision_name_annotation: String,
    /// Upper bound for one context-aware template compile; `None` waits
    /// until the caller cancels.
    pub compile_timeout_ms: Option<u64>,
    /// Directory of exported revisions for file-backed lookups.
    pub store_dir: Option<PathBuf>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            revision_name_annotation: REVISION_NAME_ANNOTATION.to_string(),
            compile_timeout_ms: Some(30_000),
            store_dir: None,
        }
    }
}

impl GateConfig {
    /// Load from a JSON file; missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `DEFGATE_*` overrides from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (environment-shaped keys).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(annotation) = lookup(ENV_REVISION_ANNOTATION) {
            self.revision_name_annotation = annotation;
        }
        if let Some(raw) = lookup(ENV_COMPILE_TIMEOUT_MS) {
            self.compile_timeout_ms = match raw.trim() {
                "" | "0" => None,
                ms => Some(ms.parse().map_err(|_| ConfigError::InvalidValue {
                    key: ENV_COMPILE_TIMEOUT_MS.to_string(),
                    value: raw.clone(),
                })?),
            };
        }
        if let Some(dir) = lookup(ENV_STORE_DIR) {
            self.store_dir = Some(PathBuf::from(dir));
        }
        Ok(self)
    }

    /// Compile options for the context-aware template validator.
    pub fn compile_options(&self) -> CompileOptions {
        let options = CompileOptions::default().with_reference_resolution();
        match self.compile_timeout_ms {
            Some(ms) => options.with_timeout(Duration::from_millis(ms)),
            None => options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = GateConfig::default();
        assert_eq!(config.revision_name_annotation, REVISION_NAME_ANNOTATION);
        assert_eq!(
            config.compile_options().timeout,
            Some(Duration::from_secs(30))
        );
        assert!(config.compile_options().resolve_references);
    }

    #[test]
    fn file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defgate.json");
        std::fs::write(&path, r#"{ "store_dir": "/srv/revisions" }"#).unwrap();

        let config = GateConfig::from_file(&path).unwrap();
        assert_eq!(config.store_dir, Some(PathBuf::from("/srv/revisions")));
        assert_eq!(config.revision_name_annotation, REVISION_NAME_ANNOTATION);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defgate.json");
        std::fs::write(&path, "store_dir = 1").unwrap();

        assert!(matches!(
            GateConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn overrides_apply() {
        let config = GateConfig::default()
            .with_overrides(lookup(&[
                (ENV_REVISION_ANNOTATION, "example.com/revision"),
                (ENV_COMPILE_TIMEOUT_MS, "0"),
                (ENV_STORE_DIR, "/tmp/revs"),
            ]))
            .unwrap();
        assert_eq!(config.revision_name_annotation, "example.com/revision");
        assert_eq!(config.compile_timeout_ms, None);
        assert_eq!(config.compile_options().timeout, None);
        assert_eq!(config.store_dir, Some(PathBuf::from("/tmp/revs")));
    }

    #[test]
    fn bad_timeout_rejected() {
        let err = GateConfig::default()
            .with_overrides(lookup(&[(ENV_COMPILE_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_COMPILE_TIMEOUT_MS));
    }
}
