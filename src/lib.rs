//! Document registry with fingerprint-based change tracking.
//!
//! Loads a directory of text documents into an in-memory cache, tracks a
//! content fingerprint per file across runs, and notifies dependent
//! subsystems when a tracked file changes.

pub mod cli;
pub mod config;
#[cfg(test)]
mod config_test;
pub mod context;
pub mod dispatch;
pub mod docs;
pub mod history;
pub mod paths;
pub mod standards;
