//! Path resolution for docreg state.
//!
//! XDG-style data directory with fallbacks, plus the fixed file names kept
//! inside the state directory.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "docreg";
const FINGERPRINTS_FILE: &str = "fingerprints.json";
const STATS_FILE: &str = "stats.json";
const HISTORY_FILE: &str = "dispatch.jsonl";

/// Default state directory.
///
/// `$XDG_DATA_HOME/docreg`, else `$HOME/.local/share/docreg`, else `.docreg`
/// in the working directory.
pub(crate) fn resolve_data_dir(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(data_home) = lookup("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    match lookup("HOME").filter(|v| !v.is_empty()) {
        Some(home) => PathBuf::from(home).join(".local/share").join(APP_DIR),
        None => PathBuf::from(format!(".{}", APP_DIR)),
    }
}

/// `state_dir/fingerprints.json`
pub fn fingerprints_path(state_dir: &Path) -> PathBuf {
    state_dir.join(FINGERPRINTS_FILE)
}

/// `state_dir/stats.json`
pub fn stats_path(state_dir: &Path) -> PathBuf {
    state_dir.join(STATS_FILE)
}

/// `state_dir/dispatch.jsonl`
pub fn history_path(state_dir: &Path) -> PathBuf {
    state_dir.join(HISTORY_FILE)
}
