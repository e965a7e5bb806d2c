//! Durable fingerprint store.
//!
//! A single JSON object on disk mapping path to fingerprint:
//!
//! ```json
//! {
//!   "docs/standards.md": "9f86d081884c7d659a2feaa0c55ad015"
//! }
//! ```
//!
//! A missing or corrupted file is never fatal: [`FingerprintStore::load`]
//! falls back to an empty mapping, which means every file is re-detected as
//! created on the next pass.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::error::{RegistryError, RegistryResult};
use super::models::Fingerprint;

/// Path → last observed fingerprint. Ordered so the file diffs cleanly.
pub type FingerprintMap = BTreeMap<String, Fingerprint>;

#[derive(Debug, Clone)]
pub struct FingerprintStore {
    path: PathBuf,
}

impl FingerprintStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fingerprint raw bytes.
    pub fn compute(bytes: &[u8]) -> Fingerprint {
        Fingerprint::compute(bytes)
    }

    /// Load the mapping, reporting why the store could not be read.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the file is missing, unreadable or not a
    /// valid mapping.
    pub fn try_load(&self) -> RegistryResult<FingerprintMap> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            RegistryError::StoreUnavailable {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        serde_json::from_str(&raw).map_err(|e| RegistryError::StoreUnavailable {
            path: self.path.display().to_string(),
            message: format!("corrupted store: {}", e),
        })
    }

    /// Load the mapping, treating a missing or corrupted store as empty.
    pub fn load(&self) -> FingerprintMap {
        match self.try_load() {
            Ok(map) => {
                debug!(path = %self.path.display(), entries = map.len(), "Loaded fingerprint store");
                map
            }
            Err(e) if !self.path.exists() => {
                debug!(error = %e, "No fingerprint store yet, starting empty");
                FingerprintMap::new()
            }
            Err(e) => {
                warn!(error = %e, "Falling back to an empty fingerprint store");
                FingerprintMap::new()
            }
        }
    }

    /// Persist the mapping atomically.
    ///
    /// # Errors
    /// Returns `StoreWrite` if the directory or the file cannot be written.
    pub fn save(&self, map: &FingerprintMap) -> RegistryResult<()> {
        write_json_atomic(&self.path, map).map_err(|e| RegistryError::StoreWrite {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Serialize `value` as pretty JSON to a temp file next to `path`, then
/// rename it into place so readers never observe a half-written file.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut tmp, value).map_err(std::io::Error::other)?;
    tmp.write_all(b"\n")?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
