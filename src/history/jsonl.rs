//! JSONL (JSON Lines) serialization utilities.
//!
//! One JSON object per line, newline-delimited. Used for the append-only
//! dispatch history.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during JSONL operations.
#[derive(Error, Diagnostic, Debug)]
pub enum JsonlError {
    #[error("IO error: {0}")]
    #[diagnostic(code(docreg::history::jsonl::io))]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    #[diagnostic(code(docreg::history::jsonl::serialize))]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid JSONL line {line}: {error}")]
    #[diagnostic(code(docreg::history::jsonl::invalid_line))]
    InvalidLine { line: usize, error: String },
}

/// Append one entity as a line, creating the file and its parent directory
/// when needed. A previous line left without its newline is terminated first
/// so the new entity always starts a line of its own.
///
/// # Errors
/// Returns error if the file cannot be opened/written or serialization fails.
pub fn append_jsonl<T: Serialize>(path: &Path, entity: &T) -> Result<(), JsonlError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(entity)?;
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)?;

    if file.metadata()?.len() > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            writeln!(file)?;
        }
    }

    writeln!(file, "{}", json)?;
    file.flush()?;
    Ok(())
}

/// Read entities from a JSONL file.
///
/// Empty lines are skipped. Any line that fails to deserialize is an error.
///
/// # Errors
/// Returns error if file cannot be read or any line fails to deserialize.
pub fn read_jsonl<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, JsonlError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut entities = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;

        if line.trim().is_empty() {
            continue;
        }

        let entity: T = serde_json::from_str(&line).map_err(|e| JsonlError::InvalidLine {
            line: line_num + 1,
            error: e.to_string(),
        })?;

        entities.push(entity);
    }

    Ok(entities)
}

/// Read entities from a JSONL file, skipping lines that fail to deserialize.
///
/// Each skipped line is logged. Used for logs where a torn final line (an
/// append interrupted by a crash) must not hide the entries before it.
///
/// # Errors
/// Returns error only if the file cannot be read.
pub fn read_jsonl_lossy<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, JsonlError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut entities = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str(&line) {
            Ok(entity) => entities.push(entity),
            Err(e) => warn!(
                path = %path.display(),
                line = line_num + 1,
                error = %e,
                "Skipping invalid JSONL line"
            ),
        }
    }

    Ok(entities)
}
