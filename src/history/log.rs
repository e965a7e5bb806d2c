//! Dispatch history log.
//!
//! One JSON line per result. Once the active file reaches its size limit it
//! is moved to `<name>.1` (replacing the previous rotation) and a fresh file
//! is started, so at most two generations are kept on disk.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::jsonl::{JsonlError, append_jsonl, read_jsonl_lossy};
use crate::dispatch::DispatchResult;

/// Size at which the active log is rotated.
pub const DEFAULT_MAX_LOG_BYTES: u64 = 1024 * 1024;

/// Append-only record of every dispatch.
#[derive(Debug, Clone)]
pub struct DispatchHistory {
    path: PathBuf,
    max_bytes: u64,
}

impl DispatchHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_max_bytes(path, DEFAULT_MAX_LOG_BYTES)
    }

    pub fn with_max_bytes(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            path: path.into(),
            max_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the previous generation.
    pub fn rotated_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".1");
        PathBuf::from(name)
    }

    /// # Errors
    /// Returns error if the log cannot be rotated or written.
    pub fn record(&self, result: &DispatchResult) -> Result<(), JsonlError> {
        self.rotate_if_full()?;
        append_jsonl(&self.path, result)?;
        debug!(path = %self.path.display(), changed = %result.changed_file, "Recorded dispatch");
        Ok(())
    }

    /// The last `limit` results, oldest first, across both generations.
    /// A missing log is empty and unparseable lines are skipped.
    ///
    /// # Errors
    /// Returns error if an existing log file cannot be read.
    pub fn recent(&self, limit: usize) -> Result<Vec<DispatchResult>, JsonlError> {
        let mut entries: Vec<DispatchResult> = Vec::new();
        for path in [self.rotated_path(), self.path.clone()] {
            if path.exists() {
                entries.extend(read_jsonl_lossy::<DispatchResult>(&path)?);
            }
        }

        let skip = entries.len().saturating_sub(limit);
        Ok(entries.split_off(skip))
    }

    fn rotate_if_full(&self) -> std::io::Result<()> {
        let size = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(()),
        };

        if size >= self.max_bytes {
            std::fs::rename(&self.path, self.rotated_path())?;
            debug!(path = %self.path.display(), size, "Rotated dispatch history");
        }
        Ok(())
    }
}
