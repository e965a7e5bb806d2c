//! Configuration resolution.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. YAML file (`--config`, or `docreg.yaml` in the working directory)
//! 3. environment (`DOCREG_ROOT`, `DOCREG_STATE_DIR`)
//! 4. command-line overrides
//!
//! Example `docreg.yaml`:
//!
//! ```yaml
//! root: platform/docs
//! extensions: [md, txt]
//! verify_sample: 10
//! dependencies:
//!   - category: dependency-map
//!     patterns: [dependency_map]
//!     actions: [invalidate-cache, recompute-stats, notify]
//! actions:
//!   notify:
//!     command: ./scripts/notify.sh
//!     args: ["{path}"]
//! standards:
//!   change-detector: [doc-standard-12]
//! ```

use miette::Diagnostic;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dispatch::{CommandSpec, DependencyEdge, DependencyTable};
use crate::docs::DEFAULT_VERIFY_SAMPLE;
use crate::paths::resolve_data_dir;

pub const DEFAULT_CONFIG_FILE: &str = "docreg.yaml";
pub const ENV_ROOT: &str = "DOCREG_ROOT";
pub const ENV_STATE_DIR: &str = "DOCREG_STATE_DIR";

const DEFAULT_ROOT: &str = "docs";
const DEFAULT_EXTENSION: &str = "md";

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(docreg::config::read))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    #[diagnostic(
        code(docreg::config::parse),
        help("See the example configuration in the crate documentation for valid keys.")
    )]
    Parse { path: String, message: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(docreg::config::invalid))]
    Invalid { message: String },
}

/// Shape of the YAML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    root: Option<PathBuf>,
    extensions: Option<Vec<String>>,
    state_dir: Option<PathBuf>,
    verify_sample: Option<usize>,
    dependencies: Option<Vec<DependencyEdge>>,
    actions: BTreeMap<String, CommandSpec>,
    standards: BTreeMap<String, Vec<String>>,
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub extensions: Vec<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub state_dir: PathBuf,
    pub verify_sample: usize,
    pub dependencies: Vec<DependencyEdge>,
    pub actions: BTreeMap<String, CommandSpec>,
    pub standards: BTreeMap<String, Vec<String>>,
}

impl Config {
    /// Defaults with the given state directory.
    pub fn with_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            state_dir: state_dir.into(),
            verify_sample: DEFAULT_VERIFY_SAMPLE,
            dependencies: DependencyTable::default_edges(),
            actions: BTreeMap::new(),
            standards: BTreeMap::new(),
        }
    }

    /// Resolve configuration from every source using the process environment.
    ///
    /// # Errors
    /// Returns error if the config file cannot be read or parsed, or the
    /// resolved values are invalid.
    pub fn resolve(overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |key| env::var(key).ok())
    }

    pub(crate) fn resolve_with(
        overrides: &Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::with_state_dir(resolve_data_dir(&lookup));

        let file = match &overrides.config_file {
            Some(path) => Some(path.clone()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };
        if let Some(path) = file {
            config.apply_file(read_file_config(&path)?);
        }

        if let Some(root) = lookup(ENV_ROOT).filter(|v| !v.is_empty()) {
            config.root = PathBuf::from(root);
        }
        if let Some(state_dir) = lookup(ENV_STATE_DIR).filter(|v| !v.is_empty()) {
            config.state_dir = PathBuf::from(state_dir);
        }

        if let Some(root) = &overrides.root {
            config.root = root.clone();
        }
        if let Some(state_dir) = &overrides.state_dir {
            config.state_dir = state_dir.clone();
        }
        if !overrides.extensions.is_empty() {
            config.extensions = overrides.extensions.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(root) = file.root {
            self.root = root;
        }
        if let Some(extensions) = file.extensions {
            self.extensions = extensions;
        }
        if let Some(state_dir) = file.state_dir {
            self.state_dir = state_dir;
        }
        if let Some(sample) = file.verify_sample {
            self.verify_sample = sample;
        }
        if let Some(dependencies) = file.dependencies {
            self.dependencies = dependencies;
        }
        self.actions = file.actions;
        self.standards = file.standards;
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some((name, _)) = self
            .actions
            .iter()
            .find(|(_, spec)| spec.command.trim().is_empty())
        {
            return Err(ConfigError::Invalid {
                message: format!("action '{}' has an empty command", name),
            });
        }

        if let Some(edge) = self.dependencies.iter().find(|e| e.category.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "dependency edge with patterns {:?} has no category",
                    edge.patterns
                ),
            });
        }

        Ok(())
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
