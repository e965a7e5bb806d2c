//! Document registry core.
//!
//! - `loader`: walks a document directory into [`DocumentRecord`]s
//! - `fingerprint`: durable path → fingerprint store
//! - `detector`: created/modified classification against the store
//! - `cache`: in-memory path → record cache and its integrity check

mod cache;
#[cfg(test)]
mod cache_test;
mod detector;
mod error;
mod fingerprint;
#[cfg(test)]
mod fingerprint_test;
mod loader;
#[cfg(test)]
mod loader_test;
mod models;

pub use cache::{DEFAULT_VERIFY_SAMPLE, DocumentCache, VerificationReport};
pub use detector::{ChangeDetector, Classification};
pub use error::{RegistryError, RegistryResult};
pub use fingerprint::{FingerprintMap, FingerprintStore};
pub(crate) use fingerprint::write_json_atomic;
pub use loader::{
    DocumentFilter, LoadOutcome, SkippedFile, is_archived, load_documents, load_file,
};
pub use models::{ChangeKind, DocumentRecord, Fingerprint, count_words};
