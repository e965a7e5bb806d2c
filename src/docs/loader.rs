//! Content loading.
//!
//! Walks a document directory and turns every matching text file into a
//! [`DocumentRecord`]. Hidden entries are skipped; `.ignore`/`.gitignore`
//! files are not consulted. Any directory or file whose path below the root
//! has a component containing "archive" is pruned:
//!
//! ```text
//! docs/
//!   standards.md          loaded
//!   [archive]/old.md      skipped
//!   archive/2023/x.md     skipped
//! ```

use ignore::WalkBuilder;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use super::error::{RegistryError, RegistryResult};
use super::models::DocumentRecord;

/// Path component marker that excludes a subtree from loading.
const ARCHIVE_MARKER: &str = "archive";

/// A file the loader found but could not turn into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Result of a directory load: the records plus whatever was skipped.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub records: Vec<DocumentRecord>,
    pub skipped: Vec<SkippedFile>,
}

/// The set of paths that belong to the registry and the key each is cached
/// and fingerprinted under.
///
/// Keys are lexically normalised (`.` dropped, `..` folded) and expressed
/// relative to the root the way it was configured, so `docs/./a.md`,
/// `docs/x/../a.md` and the absolute form of `docs/a.md` all share one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFilter {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DocumentFilter {
    pub fn new(root: &Path, extensions: &[String]) -> Self {
        Self {
            root: normalize_path(root),
            extensions: extensions.to_vec(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Key for `path`. Paths outside the root are only normalised.
    pub fn key(&self, path: &Path) -> String {
        let cleaned = normalize_path(path);
        if cleaned.is_absolute() != self.root.is_absolute()
            && let Some(rebased) = self.rebase(&cleaned)
        {
            return display_key(&rebased);
        }
        display_key(&cleaned)
    }

    /// Whether the loader would load `key`: below the root, not archived,
    /// and carrying an accepted extension.
    pub fn accepts(&self, key: &str) -> bool {
        let path = Path::new(key);
        let under_root = if self.root.as_os_str().is_empty() {
            path.is_relative() && !path.starts_with("..")
        } else {
            path.starts_with(&self.root) && path != self.root
        };

        under_root && !is_archived(&self.root, path) && matches_extension(path, &self.extensions)
    }

    /// Re-express `path` relative to the configured root when the two differ
    /// in absoluteness.
    fn rebase(&self, path: &Path) -> Option<PathBuf> {
        let absolute_path = normalize_path(&std::path::absolute(path).ok()?);
        let absolute_root = normalize_path(&std::path::absolute(non_empty(&self.root)).ok()?);
        let relative = absolute_path.strip_prefix(&absolute_root).ok()?;
        Some(self.root.join(relative))
    }
}

/// Load every file under `root` whose extension is in `extensions`.
///
/// An empty `extensions` slice accepts every file. A missing root yields an
/// empty outcome. Unreadable or non-UTF-8 files are logged, listed in
/// [`LoadOutcome::skipped`] and do not abort the walk. Records are keyed by
/// [`DocumentFilter::key`].
pub fn load_documents(root: &Path, extensions: &[String]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    if !root.is_dir() {
        debug!(root = %root.display(), "Document root does not exist, nothing to load");
        return outcome;
    }

    let filter = DocumentFilter::new(root, extensions);
    let filter_root = root.to_path_buf();
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| !is_archived(&filter_root, entry.path()))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        if !matches_extension(path, extensions) {
            continue;
        }

        match read_document(path, filter.key(path)) {
            Ok(record) => outcome.records.push(record),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable document");
                outcome.skipped.push(SkippedFile {
                    path: path.to_string_lossy().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(
        root = %root.display(),
        loaded = outcome.records.len(),
        skipped = outcome.skipped.len(),
        "Loaded documents"
    );
    outcome
}

/// Read a single file into a record keyed by `path` as given.
///
/// # Errors
/// Returns `FileUnreadable` if the file cannot be read or is not UTF-8 text.
pub fn load_file(path: &Path) -> RegistryResult<DocumentRecord> {
    read_document(path, path.to_string_lossy().to_string())
}

fn read_document(path: &Path, key: String) -> RegistryResult<DocumentRecord> {
    let bytes = std::fs::read(path).map_err(|e| RegistryError::FileUnreadable {
        path: key.clone(),
        message: e.to_string(),
    })?;

    let content = String::from_utf8(bytes).map_err(|e| RegistryError::FileUnreadable {
        path: key.clone(),
        message: format!("not valid UTF-8 text ({})", e.utf8_error()),
    })?;

    Ok(DocumentRecord::new(key, content))
}

/// Whether any component of `path` below `root` contains the archive marker.
pub fn is_archived(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .any(|c| {
            c.as_os_str()
                .to_string_lossy()
                .to_lowercase()
                .contains(ARCHIVE_MARKER)
        })
}

/// Lexical normalisation without touching the filesystem: `.` components are
/// dropped and `..` folds into its parent where one exists.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn non_empty(path: &Path) -> &Path {
    if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    }
}

fn display_key(path: &Path) -> String {
    non_empty(path).to_string_lossy().to_string()
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }

    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };

    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_matches_extension() {
        let md = vec!["md".to_string()];
        assert!(matches_extension(Path::new("a/b.md"), &md));
        assert!(matches_extension(Path::new("a/b.MD"), &md));
        assert!(!matches_extension(Path::new("a/b.txt"), &md));
        assert!(!matches_extension(Path::new("a/README"), &md));

        let dotted = vec![".txt".to_string()];
        assert!(matches_extension(Path::new("notes.txt"), &dotted));

        assert!(matches_extension(Path::new("anything.bin"), &[]));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("docs/./a.md")), PathBuf::from("docs/a.md"));
        assert_eq!(normalize_path(Path::new("docs/x/../a.md")), PathBuf::from("docs/a.md"));
        assert_eq!(normalize_path(Path::new("./docs//a.md")), PathBuf::from("docs/a.md"));
        assert_eq!(normalize_path(Path::new("../a.md")), PathBuf::from("../a.md"));
        assert_eq!(normalize_path(Path::new("/../a.md")), PathBuf::from("/a.md"));
        assert_eq!(normalize_path(Path::new(".")), PathBuf::new());
    }

    #[test]
    fn test_is_archived_ignores_root_components() {
        let root = PathBuf::from("/srv/archive-mirror/docs");
        assert!(!is_archived(&root, &root.join("x.md")));
        assert!(is_archived(&root, &root.join("[archive]/y.md")));
        assert!(is_archived(&root, &root.join("Archive/2023/z.md")));
    }
}
