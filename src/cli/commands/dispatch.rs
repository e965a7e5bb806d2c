//! Dispatch and history commands.

use crate::cli::error::CliResult;
use crate::cli::utils::{
    CommandOutput, OutputFormat, apply_table_style, to_json, truncate_with_ellipsis,
};
use crate::context::RegistryContext;
use crate::dispatch::{ActionOutcome, DispatchResult};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct OutcomeDisplay {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&ActionOutcome> for OutcomeDisplay {
    fn from(outcome: &ActionOutcome) -> Self {
        Self {
            action: outcome.action.clone(),
            status: outcome.status.to_string(),
            detail: truncate_with_ellipsis(outcome.detail.as_deref().unwrap_or("-"), 60),
        }
    }
}

#[derive(Tabled)]
struct HistoryDisplay {
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Command")]
    command: String,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Actions")]
    actions: usize,
    #[tabled(rename = "Success")]
    success: String,
}

/// Human-readable summary of a dispatch result.
pub fn render_dispatch(result: &DispatchResult) -> String {
    if result.dependencies_updated.is_empty() {
        return format!("No dependents registered for {}", result.changed_file);
    }

    let rows: Vec<OutcomeDisplay> = result
        .dependencies_updated
        .iter()
        .map(OutcomeDisplay::from)
        .collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);

    let icon = if result.success { "✓" } else { "✗" };
    format!(
        "{}\n{} {} of {} actions succeeded (categories: {})",
        table,
        icon,
        result.dependencies_updated.len() - result.failed().count(),
        result.dependencies_updated.len(),
        result.categories.join(", ")
    )
}

/// Run the dependents of a file without change detection.
pub fn dispatch(
    ctx: &RegistryContext,
    path: &str,
    format: OutputFormat,
) -> CliResult<CommandOutput> {
    let result = ctx.dispatch(path);
    let text = match format {
        OutputFormat::Json => to_json(&result)?,
        OutputFormat::Table => render_dispatch(&result),
    };
    Ok(CommandOutput::with_status(text, result.success))
}

/// Show the most recent dispatch results.
pub fn history(
    ctx: &RegistryContext,
    limit: usize,
    format: OutputFormat,
) -> CliResult<CommandOutput> {
    let entries = ctx.history().recent(limit)?;

    if format == OutputFormat::Json {
        return Ok(CommandOutput::ok(to_json(&entries)?));
    }

    if entries.is_empty() {
        return Ok(CommandOutput::ok("No dispatches recorded".to_string()));
    }

    let rows: Vec<HistoryDisplay> = entries
        .iter()
        .map(|r| HistoryDisplay {
            timestamp: r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            command: r.command.clone(),
            file: truncate_with_ellipsis(&r.changed_file, 50),
            actions: r.dependencies_updated.len(),
            success: if r.success { "yes" } else { "no" }.to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    Ok(CommandOutput::ok(table.to_string()))
}
