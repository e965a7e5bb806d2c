//! In-memory document cache.
//!
//! Holds at most one [`DocumentRecord`] per path. Entries are guarded per
//! path by the underlying `DashMap` shard locks, so a concurrent
//! `invalidate` and `get` on the same path cannot interleave.
//!
//! Entries are never evicted on their own; stale records live until they are
//! invalidated or the process exits.

use dashmap::DashMap;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use super::error::RegistryResult;
use super::loader::load_file;
use super::models::DocumentRecord;

/// Default number of paths sampled by [`DocumentCache::verify`].
pub const DEFAULT_VERIFY_SAMPLE: usize = 10;

#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: DashMap<String, DocumentRecord>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert records, replacing any existing entry with the same path.
    pub fn populate(&self, records: impl IntoIterator<Item = DocumentRecord>) {
        for record in records {
            self.insert(record);
        }
    }

    /// Insert a record, returning the one it replaced.
    pub fn insert(&self, record: DocumentRecord) -> Option<DocumentRecord> {
        self.entries.insert(record.path().to_string(), record)
    }

    pub fn get(&self, path: &str) -> Option<DocumentRecord> {
        self.entries.get(path).map(|entry| entry.value().clone())
    }

    /// Drop the entry for `path`. Returns whether one was present.
    pub fn invalidate(&self, path: &str) -> bool {
        let removed = self.entries.remove(path).is_some();
        if removed {
            debug!(path, "Invalidated cache entry");
        }
        removed
    }

    /// Invalidate `path` and load it again from disk.
    ///
    /// # Errors
    /// Returns `FileUnreadable` when the reload fails; the entry stays absent.
    pub fn refresh(&self, path: &str) -> RegistryResult<DocumentRecord> {
        self.invalidate(path);
        let record = load_file(Path::new(path))?;
        self.insert(record.clone());
        Ok(record)
    }

    /// All cached paths, sorted.
    pub fn all_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_words(&self) -> usize {
        self.entries.iter().map(|e| e.value().word_count()).sum()
    }

    /// Compare up to `sample_size` cached entries against the backing files.
    ///
    /// Samples the first paths in sorted order. An entry whose file can no
    /// longer be read counts as a mismatch. Nothing is repaired.
    pub fn verify(&self, sample_size: usize) -> VerificationReport {
        let mut report = VerificationReport::default();

        for path in self.all_paths().into_iter().take(sample_size) {
            let Some(cached) = self.get(&path) else {
                continue;
            };

            let on_disk = std::fs::read(Path::new(&path));
            let matches = matches!(&on_disk, Ok(bytes) if bytes.as_slice() == cached.content().as_bytes());

            report.sampled += 1;
            if matches {
                report.matches += 1;
            } else {
                debug!(path, "Cached content differs from backing file");
                report.mismatches += 1;
            }
        }

        report.accuracy = accuracy(report.matches, report.sampled);
        report
    }
}

/// Cache integrity diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VerificationReport {
    pub sampled: usize,
    pub matches: usize,
    pub mismatches: usize,
    /// Percentage of sampled entries that matched, in `[0, 100]`.
    pub accuracy: f64,
}

fn accuracy(matches: usize, sampled: usize) -> f64 {
    if sampled == 0 {
        return 0.0;
    }
    matches as f64 / sampled as f64 * 100.0
}
