//! Registry context.
//!
//! Owns every component of the registry and wires them together. Created
//! with [`RegistryContext::init`] and closed with [`RegistryContext::teardown`];
//! nothing is initialised as a side effect of loading a module.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::dispatch::{
    ActionRegistry, CommandAction, DependencyTable, DispatchResult, Dispatcher,
};
use crate::docs::{
    ChangeDetector, ChangeKind, DocumentCache, DocumentFilter, FingerprintStore, RegistryError,
    RegistryResult, SkippedFile, VerificationReport, load_documents, load_file,
};
use crate::history::DispatchHistory;
use crate::paths::{fingerprints_path, history_path, stats_path};
use crate::standards::StandardsRegistry;

/// Standards the built-in components are registered against at init.
const BUILTIN_STANDARDS: &[(&str, &str)] = &[
    ("fingerprint-store", "deterministic-fingerprints"),
    ("change-detector", "at-least-once-refresh"),
    ("document-cache", "single-record-per-path"),
    ("dispatcher", "isolated-action-failures"),
];

/// Outcome of running the full pipeline on one file.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    pub path: String,
    pub change: Option<ChangeKind>,
    pub dispatch: Option<DispatchResult>,
    /// Whether the new fingerprint was persisted.
    pub committed: bool,
}

impl ProcessOutcome {
    /// An unchanged file, or a change whose dispatch fully succeeded and was committed.
    pub fn success(&self) -> bool {
        match &self.dispatch {
            Some(result) => result.success && self.committed,
            None => true,
        }
    }
}

/// Tracking change for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedChange {
    pub path: String,
    pub change: ChangeKind,
}

/// Snapshot of the registry state.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStatus {
    pub root: PathBuf,
    pub state_dir: PathBuf,
    pub cached_documents: usize,
    pub total_words: usize,
    pub tracked_fingerprints: usize,
    pub skipped_files: usize,
}

pub struct RegistryContext {
    config: Config,
    filter: DocumentFilter,
    cache: DocumentCache,
    detector: ChangeDetector,
    dispatcher: Dispatcher,
    history: DispatchHistory,
    standards: StandardsRegistry,
    skipped: Vec<SkippedFile>,
}

impl RegistryContext {
    /// Build every component from `config` and load the document root.
    ///
    /// # Errors
    /// Returns `ConfigurationMissing` when the root directory is absent.
    pub fn init(config: Config) -> RegistryResult<Self> {
        if !config.root.is_dir() {
            return Err(RegistryError::ConfigurationMissing {
                message: format!(
                    "document root {} does not exist or is not a directory",
                    config.root.display()
                ),
            });
        }

        let filter = DocumentFilter::new(&config.root, &config.extensions);
        let outcome = load_documents(&config.root, &config.extensions);
        let cache = DocumentCache::new();
        cache.populate(outcome.records);

        let detector =
            ChangeDetector::new(FingerprintStore::new(fingerprints_path(&config.state_dir)));

        let mut actions =
            ActionRegistry::with_builtins(stats_path(&config.state_dir), filter.clone());
        for (name, spec) in &config.actions {
            actions.register(name, Box::new(CommandAction::new(spec.clone())));
        }
        let dispatcher = Dispatcher::new(DependencyTable::new(config.dependencies.clone()), actions);

        let mut standards = StandardsRegistry::new();
        for (component, standard) in BUILTIN_STANDARDS {
            standards.register(component, standard);
        }
        for (component, claimed) in &config.standards {
            standards.register_all(component, claimed);
        }

        let history = DispatchHistory::new(history_path(&config.state_dir));

        info!(
            root = %config.root.display(),
            documents = cache.len(),
            skipped = outcome.skipped.len(),
            tracked = detector.tracked().len(),
            "Registry initialised"
        );

        Ok(Self {
            config,
            filter,
            cache,
            detector,
            dispatcher,
            history,
            standards,
            skipped: outcome.skipped,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn history(&self) -> &DispatchHistory {
        &self.history
    }

    pub fn standards(&self) -> &StandardsRegistry {
        &self.standards
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// The key `path` is cached and fingerprinted under.
    pub fn document_key(&self, path: &str) -> String {
        self.filter.key(Path::new(path))
    }

    /// Classify `path` and persist its fingerprint.
    ///
    /// # Errors
    /// Returns `StoreWrite` if the fingerprint cannot be persisted.
    pub fn detect(&mut self, path: &str) -> RegistryResult<Option<ChangeKind>> {
        let key = self.document_key(path);
        self.detector.detect(&key)
    }

    /// Run detection over every cached document, establishing baselines.
    /// All new fingerprints are written to the store at once.
    ///
    /// # Errors
    /// Returns `StoreWrite` if the store cannot be written; nothing is committed.
    pub fn track_all(&mut self) -> RegistryResult<Vec<TrackedChange>> {
        let mut changes = Vec::new();
        let mut pending = Vec::new();
        for path in self.cache.all_paths() {
            let classification = self.detector.classify(&path);
            if let (Some(change), Some(fingerprint)) =
                (classification.change, classification.fingerprint)
            {
                pending.push((path.clone(), fingerprint));
                changes.push(TrackedChange { path, change });
            }
        }

        self.detector.commit_all(pending)?;
        Ok(changes)
    }

    /// Dispatch for `path` without detection and record the result.
    pub fn dispatch(&self, path: &str) -> DispatchResult {
        let key = self.document_key(path);
        let result = self.dispatcher.dispatch(&key, &self.cache);
        self.record(&result);
        result
    }

    /// Detect, refresh the cache, dispatch, and commit the fingerprint only
    /// when every action succeeded.
    ///
    /// A changed path the loader would not load is invalidated rather than
    /// reloaded, so the cache only ever holds registry documents.
    ///
    /// # Errors
    /// Returns `FileUnreadable` if the target cannot be read, and `StoreWrite`
    /// if the fingerprint cannot be committed after a successful dispatch.
    pub fn process(&mut self, path: &str) -> RegistryResult<ProcessOutcome> {
        let key = self.document_key(path);
        let path = key.as_str();
        load_file(Path::new(path))?;

        let classification = self.detector.classify(path);
        let (Some(change), Some(fingerprint)) =
            (classification.change, classification.fingerprint)
        else {
            info!(path, "No change detected");
            return Ok(ProcessOutcome {
                path: path.to_string(),
                change: None,
                dispatch: None,
                committed: false,
            });
        };

        info!(path, %change, "Change detected");
        if !self.filter.accepts(path) {
            self.cache.invalidate(path);
        } else if let Err(e) = self.cache.refresh(path) {
            warn!(path, error = %e, "Failed to reload changed document into cache");
        }

        let result = self.dispatcher.dispatch_as("process", path, &self.cache);
        self.record(&result);

        let committed = if result.success {
            self.detector.commit(path, fingerprint)?;
            true
        } else {
            warn!(path, "Dispatch incomplete, fingerprint not committed");
            false
        };

        Ok(ProcessOutcome {
            path: path.to_string(),
            change: Some(change),
            dispatch: Some(result),
            committed,
        })
    }

    pub fn verify(&self, sample_size: Option<usize>) -> VerificationReport {
        self.cache
            .verify(sample_size.unwrap_or(self.config.verify_sample))
    }

    pub fn status(&self) -> RegistryStatus {
        RegistryStatus {
            root: self.config.root.clone(),
            state_dir: self.config.state_dir.clone(),
            cached_documents: self.cache.len(),
            total_words: self.cache.total_words(),
            tracked_fingerprints: self.detector.tracked().len(),
            skipped_files: self.skipped.len(),
        }
    }

    /// Persist the fingerprint store and release the context.
    ///
    /// # Errors
    /// Returns `StoreWrite` if the store cannot be written.
    pub fn teardown(self) -> RegistryResult<()> {
        self.detector.persist()?;
        info!(
            tracked = self.detector.tracked().len(),
            "Registry closed"
        );
        Ok(())
    }

    fn record(&self, result: &DispatchResult) {
        if let Err(e) = self.history.record(result) {
            warn!(error = %e, "Failed to append dispatch history");
        }
    }
}
