//! Change detection against the fingerprint store.
//!
//! Per-file state machine:
//!
//! ```text
//! UNTRACKED --first load-------> TRACKED(F0)
//! TRACKED(F0) --hash is F1-----> TRACKED(F1)   Modified
//! TRACKED(F1) --hash is F1-----> TRACKED(F1)   no change
//! ```

use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

use super::error::RegistryResult;
use super::fingerprint::{FingerprintMap, FingerprintStore};
use super::models::{ChangeKind, Fingerprint};

/// Outcome of comparing a file against its stored fingerprint, before
/// anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub path: String,
    pub change: Option<ChangeKind>,
    /// Fingerprint of the current content; `None` when the file could not be read.
    pub fingerprint: Option<Fingerprint>,
}

pub struct ChangeDetector {
    store: FingerprintStore,
    known: FingerprintMap,
}

impl ChangeDetector {
    /// Create a detector seeded from the store's current contents.
    pub fn new(store: FingerprintStore) -> Self {
        let known = store.load();
        Self { store, known }
    }

    pub fn store(&self) -> &FingerprintStore {
        &self.store
    }

    /// Every path with a stored fingerprint.
    pub fn tracked(&self) -> &FingerprintMap {
        &self.known
    }

    pub fn stored(&self, path: &str) -> Option<&Fingerprint> {
        self.known.get(path)
    }

    /// Compare the current content of `path` with its stored fingerprint.
    ///
    /// A file that cannot be read (for instance because it vanished after
    /// being listed) is reported as unchanged.
    pub fn classify(&self, path: &str) -> Classification {
        let bytes = match std::fs::read(Path::new(path)) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path, error = %e, "Cannot read tracked file, treating as unchanged");
                return Classification {
                    path: path.to_string(),
                    change: None,
                    fingerprint: None,
                };
            }
        };

        let current = FingerprintStore::compute(&bytes);
        let change = match self.known.get(path) {
            None => Some(ChangeKind::Created),
            Some(stored) if *stored != current => Some(ChangeKind::Modified),
            Some(_) => None,
        };

        Classification {
            path: path.to_string(),
            change,
            fingerprint: Some(current),
        }
    }

    /// Record `fingerprint` as the last observed state of `path` and persist
    /// the store. On a failed write the in-memory state is rolled back so the
    /// change is detected again.
    ///
    /// # Errors
    /// Returns `StoreWrite` if the store cannot be written.
    pub fn commit(&mut self, path: &str, fingerprint: Fingerprint) -> RegistryResult<()> {
        let previous = self.known.insert(path.to_string(), fingerprint);

        if let Err(e) = self.store.save(&self.known) {
            match previous {
                Some(old) => self.known.insert(path.to_string(), old),
                None => self.known.remove(path),
            };
            return Err(e);
        }

        debug!(path, "Committed fingerprint");
        Ok(())
    }

    /// Record several fingerprints with a single store write. Either all of
    /// them are kept or, when the write fails, none are.
    ///
    /// # Errors
    /// Returns `StoreWrite` if the store cannot be written.
    pub fn commit_all(
        &mut self,
        entries: impl IntoIterator<Item = (String, Fingerprint)>,
    ) -> RegistryResult<()> {
        let snapshot = self.known.clone();
        let mut count = 0;
        for (path, fingerprint) in entries {
            self.known.insert(path, fingerprint);
            count += 1;
        }
        if count == 0 {
            return Ok(());
        }

        if let Err(e) = self.store.save(&self.known) {
            self.known = snapshot;
            return Err(e);
        }

        debug!(count, "Committed fingerprints");
        Ok(())
    }

    /// Classify `path` and immediately persist the new fingerprint, so a
    /// second call without intervening edits returns `None`.
    ///
    /// # Errors
    /// Returns `StoreWrite` if the new fingerprint cannot be persisted.
    pub fn detect(&mut self, path: &str) -> RegistryResult<Option<ChangeKind>> {
        let classification = self.classify(path);

        if let (Some(kind), Some(fingerprint)) = (classification.change, classification.fingerprint)
        {
            self.commit(path, fingerprint)?;
            return Ok(Some(kind));
        }

        Ok(None)
    }

    /// Write the whole in-memory mapping back to the store.
    pub fn persist(&self) -> RegistryResult<()> {
        self.store.save(&self.known)
    }
}
