//! Persistent dispatch history.

mod jsonl;
mod log;

pub use jsonl::{JsonlError, append_jsonl, read_jsonl, read_jsonl_lossy};
pub use log::{DEFAULT_MAX_LOG_BYTES, DispatchHistory};
