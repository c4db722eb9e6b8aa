//! defgate - definition admission checks from the command line
//!
//! ## Commands
//!
//! - `version`: check a version string and its pin exclusivity
//! - `check`: run version checks and the revision immutability guard
//!   against a directory of exported revisions
//! - `revision`: print the revision a definition would publish as

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use defgate_core::{
    validate_semantic_version, validate_single_version_pin, CandidateDefinition, GateConfig,
    NamespacedName, RevisionGatherer, RevisionImmutabilityGuard, SpecDigestGatherer,
};
use defgate_state::JsonDirRevisionStore;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "defgate")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Admission checks for capability definitions", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// JSON config file
    #[arg(long, global = true, env = "DEFGATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a version string (and optionally a competing revision-name pin)
    Version {
        /// Version to check, e.g. 1.2.3
        version: String,

        /// Revision name annotation value, if any
        #[arg(long, default_value = "")]
        revision_name: String,

        /// Object type named in error messages
        #[arg(long, default_value = "Definition")]
        object_type: String,
    },

    /// Check a definition file against its published revision
    Check {
        /// Definition JSON file
        definition: PathBuf,

        /// Directory of exported revisions ({namespace}/{name}.json)
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// Revision name to check against (default: derived from the pin)
        #[arg(long)]
        revision: Option<String>,
    },

    /// Print the revision record a definition would be stored as
    Revision {
        /// Definition JSON file
        definition: PathBuf,

        /// Name of the revision record (default: derived from the pin)
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    defgate_core::init_tracing(cli.json, level);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Version {
            version,
            revision_name,
            object_type,
        } => cmd_version(&version, &revision_name, &object_type),
        Commands::Check {
            definition,
            store_dir,
            revision,
        } => cmd_check(&config, &definition, store_dir, revision).await,
        Commands::Revision { definition, name } => cmd_revision(&config, &definition, name),
    }
}

fn load_config(path: Option<&Path>) -> Result<GateConfig> {
    let config = match path {
        Some(path) => GateConfig::from_file(path)?,
        None => GateConfig::default(),
    };
    Ok(config.with_env()?)
}

fn read_definition(path: &Path) -> Result<CandidateDefinition> {
    let raw = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_slice(&raw).with_context(|| format!("Failed to parse definition {:?}", path))
}

/// Revision key from an explicit name or from the definition's pin.
fn revision_key(
    config: &GateConfig,
    definition: &CandidateDefinition,
    explicit: Option<String>,
) -> Option<NamespacedName> {
    match explicit {
        Some(name) => Some(NamespacedName::new(&definition.namespace, name)),
        None => definition.pinned_revision_key(&config.revision_name_annotation),
    }
}

fn cmd_version(version: &str, revision_name: &str, object_type: &str) -> Result<()> {
    validate_semantic_version(version)?;
    validate_single_version_pin(version, revision_name, object_type)?;
    println!("ok");
    Ok(())
}

async fn cmd_check(
    config: &GateConfig,
    path: &Path,
    store_dir: Option<PathBuf>,
    revision: Option<String>,
) -> Result<()> {
    let definition = read_definition(path)?;
    let revision_name = definition.revision_name_at(&config.revision_name_annotation);

    validate_semantic_version(definition.version())?;
    validate_single_version_pin(
        definition.version(),
        revision_name,
        definition.kind.label(),
    )?;

    if definition.template().is_some() {
        info!("template present; no evaluator linked into this binary, skipping template check");
    }

    let Some(key) = revision_key(config, &definition, revision) else {
        println!("ok: {} {} is not pinned to a revision", definition.kind, definition.name);
        return Ok(());
    };

    let Some(store_dir) = store_dir.or_else(|| config.store_dir.clone()) else {
        bail!("--store-dir (or DEFGATE_STORE_DIR) is required to check a pinned revision");
    };

    let guard = RevisionImmutabilityGuard::new(Arc::new(JsonDirRevisionStore::new(store_dir)));
    guard
        .validate(&definition, &key, &CancellationToken::new())
        .await?;

    println!("ok: {} {} matches revision {}", definition.kind, definition.name, key);
    Ok(())
}

fn cmd_revision(config: &GateConfig, path: &Path, name: Option<String>) -> Result<()> {
    let definition = read_definition(path)?;
    let mut revision = SpecDigestGatherer.gather(&definition)?.revision;

    if let Some(key) = revision_key(config, &definition, name) {
        revision.name = key.name;
    }

    println!("{}", serde_json::to_string_pretty(&revision)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use defgate_core::{DefinitionKind, REVISION_NAME_ANNOTATION};
    use serde_json::json;

    fn definition() -> CandidateDefinition {
        CandidateDefinition::new(
            DefinitionKind::TraitDefinition,
            "vela-system",
            "scaler",
            json!({ "version": "1.2.3" }),
        )
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_revision_overrides_pin() {
        let key = revision_key(&GateConfig::default(), &definition(), Some("scaler-v9".into()));
        assert_eq!(key, Some(NamespacedName::new("vela-system", "scaler-v9")));
    }

    #[test]
    fn configured_annotation_is_used() {
        let config = GateConfig {
            revision_name_annotation: "example.com/rev".to_string(),
            ..GateConfig::default()
        };
        let def = CandidateDefinition::new(
            DefinitionKind::TraitDefinition,
            "vela-system",
            "scaler",
            json!({}),
        )
        .with_annotation("example.com/rev", "canary")
        .with_annotation(REVISION_NAME_ANNOTATION, "ignored");

        assert_eq!(
            revision_key(&config, &def, None),
            Some(NamespacedName::new("vela-system", "scaler-vcanary"))
        );
    }

    #[test]
    fn version_command_rejects_double_pin() {
        assert!(cmd_version("1.2.3", "", "Trait").is_ok());
        let err = cmd_version("1.2.3", "rev-1", "Trait").unwrap_err();
        assert!(err.to_string().contains("Trait"));
        assert!(cmd_version("1.2", "", "Trait").is_err());
    }

    #[tokio::test]
    async fn check_against_exported_revision() {
        let dir = tempfile::tempdir().unwrap();
        let def_path = dir.path().join("scaler.json");
        std::fs::write(&def_path, serde_json::to_vec(&definition()).unwrap()).unwrap();

        let store = dir.path().join("revisions");
        let mut revision = SpecDigestGatherer.gather(&definition()).unwrap().revision;
        revision.name = "scaler-v1.2.3".to_string();
        std::fs::create_dir_all(store.join("vela-system")).unwrap();
        std::fs::write(
            store.join("vela-system").join("scaler-v1.2.3.json"),
            serde_json::to_vec(&revision).unwrap(),
        )
        .unwrap();

        let config = GateConfig::default();
        cmd_check(&config, &def_path, Some(store.clone()), None)
            .await
            .unwrap();

        let mut edited = definition();
        edited.spec["podDisruptive"] = json!(true);
        std::fs::write(&def_path, serde_json::to_vec(&edited).unwrap()).unwrap();
        let err = cmd_check(&config, &def_path, Some(store), None)
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("different with existing definitionRevision"));
    }

    #[tokio::test]
    async fn check_refuses_namespace_outside_store() {
        let dir = tempfile::tempdir().unwrap();
        let def_path = dir.path().join("scaler.json");
        let mut escaping = definition();
        escaping.namespace = "..".to_string();
        std::fs::write(&def_path, serde_json::to_vec(&escaping).unwrap()).unwrap();

        let err = cmd_check(
            &GateConfig::default(),
            &def_path,
            Some(dir.path().join("revisions")),
            None,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("invalid definitionRevision key"));
    }

    #[tokio::test]
    async fn pinned_check_requires_store() {
        let dir = tempfile::tempdir().unwrap();
        let def_path = dir.path().join("scaler.json");
        std::fs::write(&def_path, serde_json::to_vec(&definition()).unwrap()).unwrap();

        let err = cmd_check(&GateConfig::default(), &def_path, None, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--store-dir"));
    }
}
