//! Document loading and tracking commands.

use crate::cli::error::CliResult;
use crate::cli::utils::{
    CommandOutput, OutputFormat, apply_table_style, to_json, truncate_with_ellipsis,
};
use crate::context::{RegistryContext, TrackedChange};
use crate::docs::DocumentRecord;
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub(crate) struct DocumentDisplay {
    #[tabled(rename = "Path")]
    pub(crate) path: String,
    #[tabled(rename = "Words")]
    pub(crate) words: usize,
    #[tabled(rename = "Fingerprint")]
    pub(crate) fingerprint: String,
}

impl From<&DocumentRecord> for DocumentDisplay {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            path: truncate_with_ellipsis(record.path(), 70),
            words: record.word_count(),
            fingerprint: record.fingerprint().to_string(),
        }
    }
}

#[derive(Tabled)]
struct TrackedDisplay {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Change")]
    change: String,
}

/// List every loaded document.
pub fn load(ctx: &RegistryContext, format: OutputFormat) -> CliResult<CommandOutput> {
    let records: Vec<DocumentRecord> = ctx
        .cache()
        .all_paths()
        .iter()
        .filter_map(|path| ctx.cache().get(path))
        .collect();

    if format == OutputFormat::Json {
        return Ok(CommandOutput::ok(to_json(&serde_json::json!({
            "documents": records,
            "skipped": ctx.skipped(),
        }))?));
    }

    if records.is_empty() {
        return Ok(CommandOutput::ok(format!(
            "No documents found under {}",
            ctx.config().root.display()
        )));
    }

    let rows: Vec<DocumentDisplay> = records.iter().map(DocumentDisplay::from).collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);

    let mut output = table.to_string();
    output.push_str(&format!("\n{} documents loaded", records.len()));
    if !ctx.skipped().is_empty() {
        output.push_str(&format!(", {} skipped:", ctx.skipped().len()));
        for skipped in ctx.skipped() {
            output.push_str(&format!("\n  {} ({})", skipped.path, skipped.reason));
        }
    }
    Ok(CommandOutput::ok(output))
}

/// Fingerprint every loaded document, reporting new and modified ones.
pub fn track(ctx: &mut RegistryContext, format: OutputFormat) -> CliResult<CommandOutput> {
    let changes: Vec<TrackedChange> = ctx.track_all()?;

    if format == OutputFormat::Json {
        return Ok(CommandOutput::ok(to_json(&changes)?));
    }

    if changes.is_empty() {
        return Ok(CommandOutput::ok(
            "All documents unchanged since last run".to_string(),
        ));
    }

    let rows: Vec<TrackedDisplay> = changes
        .iter()
        .map(|c| TrackedDisplay {
            path: truncate_with_ellipsis(&c.path, 70),
            change: c.change.to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    Ok(CommandOutput::ok(table.to_string()))
}
