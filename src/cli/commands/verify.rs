//! Cache verification and status commands.

use crate::cli::error::CliResult;
use crate::cli::utils::{CommandOutput, OutputFormat, apply_table_style, to_json};
use crate::context::RegistryContext;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn field(item: &str, value: impl ToString) -> FieldRow {
    FieldRow {
        item: item.to_string(),
        value: value.to_string(),
    }
}

/// Compare a sample of cached documents with their files.
pub fn verify(
    ctx: &RegistryContext,
    sample: Option<usize>,
    format: OutputFormat,
) -> CliResult<CommandOutput> {
    let report = ctx.verify(sample);

    let text = match format {
        OutputFormat::Json => to_json(&report)?,
        OutputFormat::Table => {
            let mut table = Table::new(vec![
                field("Sampled", report.sampled),
                field("Matches", report.matches),
                field("Mismatches", report.mismatches),
                field("Accuracy", format!("{:.1}%", report.accuracy)),
            ]);
            apply_table_style(&mut table);
            table.to_string()
        }
    };
    Ok(CommandOutput::ok(text))
}

/// Show root, state location and counters.
pub fn status(ctx: &RegistryContext, format: OutputFormat) -> CliResult<CommandOutput> {
    let status = ctx.status();

    let text = match format {
        OutputFormat::Json => to_json(&status)?,
        OutputFormat::Table => {
            let mut table = Table::new(vec![
                field("Root", status.root.display()),
                field("State directory", status.state_dir.display()),
                field("Cached documents", status.cached_documents),
                field("Total words", status.total_words),
                field("Tracked fingerprints", status.tracked_fingerprints),
                field("Skipped files", status.skipped_files),
            ]);
            apply_table_style(&mut table);
            table.to_string()
        }
    };
    Ok(CommandOutput::ok(text))
}
