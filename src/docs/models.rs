//! Document registry domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of digest bytes kept in a fingerprint (128 bits).
const FINGERPRINT_BYTES: usize = 16;

/// Deterministic content hash of a file's raw bytes.
///
/// SHA-256 truncated to 128 bits and rendered as lower-case hex. Equal bytes
/// always give equal fingerprints; path and file metadata never take part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a byte slice.
    pub fn compute(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hash = hasher.finalize();
        Self(
            hash[..FINGERPRINT_BYTES]
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A loaded document.
///
/// Fields are private so that `fingerprint` and `word_count` can never drift
/// from `content`: the only way to change the content is [`DocumentRecord::set_content`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    path: String,
    content: String,
    fingerprint: Fingerprint,
    word_count: usize,
    last_loaded_at: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn new(path: impl Into<String>, content: String) -> Self {
        let fingerprint = Fingerprint::compute(content.as_bytes());
        let word_count = count_words(&content);
        Self {
            path: path.into(),
            content,
            fingerprint,
            word_count,
            last_loaded_at: Utc::now(),
        }
    }

    /// Replace the content, recomputing every derived field.
    pub fn set_content(&mut self, content: String) {
        self.fingerprint = Fingerprint::compute(content.as_bytes());
        self.word_count = count_words(&content);
        self.content = content;
        self.last_loaded_at = Utc::now();
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn last_loaded_at(&self) -> DateTime<Utc> {
        self.last_loaded_at
    }
}

/// Whitespace-delimited word count.
pub fn count_words(content: &str) -> usize {
    content.split_whitespace().count()
}

/// How a tracked file changed since its fingerprint was last stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Modified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Modified => "modified",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
