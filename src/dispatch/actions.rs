//! Refresh actions run by the dispatcher.
//!
//! Each action is a [`RefreshAction`] registered under a name in an
//! [`ActionRegistry`]. The dependency table refers to actions by that name.

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Command, Output};
use thiserror::Error;
use tracing::debug;

use crate::docs::{DocumentCache, DocumentFilter, RegistryError, write_json_atomic};

#[cfg(test)]
use mockall::automock;

pub const INVALIDATE_CACHE: &str = "invalidate-cache";
pub const RELOAD_CACHE: &str = "reload-cache";
pub const RECOMPUTE_STATS: &str = "recompute-stats";

/// Placeholder substituted with the changed path in command arguments.
const PATH_PLACEHOLDER: &str = "{path}";

/// Errors raised by a single refresh action.
#[derive(Error, Diagnostic, Debug)]
pub enum ActionError {
    #[error("No refresh action registered as '{0}'")]
    #[diagnostic(code(docreg::dispatch::unknown_action))]
    UnknownAction(String),

    #[error("{0}")]
    #[diagnostic(code(docreg::dispatch::registry))]
    Registry(#[from] RegistryError),

    #[error("IO error: {0}")]
    #[diagnostic(code(docreg::dispatch::io))]
    Io(#[from] std::io::Error),

    #[error("Command not found: {0}")]
    #[diagnostic(code(docreg::dispatch::command_not_found))]
    CommandNotFound(String),

    #[error("Command returned non-zero exit code {code}: {output}")]
    #[diagnostic(code(docreg::dispatch::non_zero_exit))]
    NonZeroExit { code: i32, output: String },

    #[error("{message}")]
    #[diagnostic(code(docreg::dispatch::failed))]
    Failed { message: String },
}

/// A routine that brings one dependent subsystem up to date after a change.
#[cfg_attr(test, automock)]
pub trait RefreshAction {
    /// Refresh for `changed_path`, returning a short detail message.
    fn refresh(&self, changed_path: &str, cache: &DocumentCache) -> Result<String, ActionError>;
}

/// Drops the changed path from the document cache.
pub struct InvalidateCacheAction;

impl RefreshAction for InvalidateCacheAction {
    fn refresh(&self, changed_path: &str, cache: &DocumentCache) -> Result<String, ActionError> {
        if cache.invalidate(changed_path) {
            Ok("cache entry removed".to_string())
        } else {
            Ok("not cached".to_string())
        }
    }
}

/// Re-reads the changed path into the document cache.
///
/// Paths the loader would not load (archived, outside the root, other
/// extensions) are only invalidated.
pub struct ReloadCacheAction {
    filter: DocumentFilter,
}

impl ReloadCacheAction {
    pub fn new(filter: DocumentFilter) -> Self {
        Self { filter }
    }
}

impl RefreshAction for ReloadCacheAction {
    fn refresh(&self, changed_path: &str, cache: &DocumentCache) -> Result<String, ActionError> {
        if !self.filter.accepts(changed_path) {
            cache.invalidate(changed_path);
            return Ok("not a registry document, not cached".to_string());
        }

        let record = cache.refresh(changed_path)?;
        Ok(format!("reloaded ({} words)", record.word_count()))
    }
}

/// Summary statistics over the cached documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub documents: usize,
    pub total_words: usize,
    pub generated_at: DateTime<Utc>,
}

impl SummaryStats {
    pub fn from_cache(cache: &DocumentCache) -> Self {
        Self {
            documents: cache.len(),
            total_words: cache.total_words(),
            generated_at: Utc::now(),
        }
    }
}

/// Recomputes [`SummaryStats`] and writes them to a JSON file.
pub struct RecomputeStatsAction {
    stats_path: PathBuf,
}

impl RecomputeStatsAction {
    pub fn new(stats_path: impl Into<PathBuf>) -> Self {
        Self {
            stats_path: stats_path.into(),
        }
    }
}

impl RefreshAction for RecomputeStatsAction {
    fn refresh(&self, _changed_path: &str, cache: &DocumentCache) -> Result<String, ActionError> {
        let stats = SummaryStats::from_cache(cache);
        write_json_atomic(&self.stats_path, &stats)?;
        Ok(format!(
            "{} documents, {} words",
            stats.documents, stats.total_words
        ))
    }
}

/// Command action definition as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Runs an external program. `{path}` in an argument becomes the changed path.
pub struct CommandAction {
    spec: CommandSpec,
}

impl CommandAction {
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }

    fn run(&self, changed_path: &str) -> Result<Output, ActionError> {
        let args: Vec<String> = self
            .spec
            .args
            .iter()
            .map(|arg| arg.replace(PATH_PLACEHOLDER, changed_path))
            .collect();

        debug!(command = %self.spec.command, ?args, "Running refresh command");

        Command::new(&self.spec.command)
            .args(&args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ActionError::CommandNotFound(self.spec.command.clone())
                } else {
                    ActionError::Io(e)
                }
            })
    }
}

impl RefreshAction for CommandAction {
    fn refresh(&self, changed_path: &str, _cache: &DocumentCache) -> Result<String, ActionError> {
        let output = self.run(changed_path)?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.success() {
            return Ok(stdout);
        }

        let combined = match (stdout.is_empty(), stderr.is_empty()) {
            (false, false) => format!("{}\n{}", stdout, stderr),
            (false, true) => stdout,
            _ => stderr,
        };
        Err(ActionError::NonZeroExit {
            code: output.status.code().unwrap_or(-1),
            output: combined,
        })
    }
}

/// Named refresh actions.
#[derive(Default)]
pub struct ActionRegistry {
    actions: BTreeMap<String, Box<dyn RefreshAction>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in cache and statistics actions.
    pub fn with_builtins(stats_path: impl Into<PathBuf>, filter: DocumentFilter) -> Self {
        let mut registry = Self::new();
        registry.register(INVALIDATE_CACHE, Box::new(InvalidateCacheAction));
        registry.register(RELOAD_CACHE, Box::new(ReloadCacheAction::new(filter)));
        registry.register(
            RECOMPUTE_STATS,
            Box::new(RecomputeStatsAction::new(stats_path)),
        );
        registry
    }

    /// Register `action` under `name`, replacing any previous one.
    pub fn register(&mut self, name: &str, action: Box<dyn RefreshAction>) {
        self.actions.insert(name.to_string(), action);
    }

    pub fn get(&self, name: &str) -> Option<&dyn RefreshAction> {
        self.actions.get(name).map(|a| a.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.keys().map(|k| k.as_str()).collect()
    }
}
