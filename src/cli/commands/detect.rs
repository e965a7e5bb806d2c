//! Change detection commands.

use crate::cli::commands::dispatch::render_dispatch;
use crate::cli::error::CliResult;
use crate::cli::utils::{CommandOutput, OutputFormat, to_json};
use crate::context::RegistryContext;

/// Classify a file and persist its fingerprint.
pub fn detect(
    ctx: &mut RegistryContext,
    path: &str,
    format: OutputFormat,
) -> CliResult<CommandOutput> {
    let key = ctx.document_key(path);
    let change = ctx.detect(&key)?;
    let label = change.map(|c| c.as_str()).unwrap_or("unchanged");

    let text = match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "path": key,
            "change": change,
        }))?,
        OutputFormat::Table => format!("{}: {}", key, label),
    };
    Ok(CommandOutput::ok(text))
}

/// Detect, refresh and dispatch for one file.
pub fn process(
    ctx: &mut RegistryContext,
    path: &str,
    format: OutputFormat,
) -> CliResult<CommandOutput> {
    let outcome = ctx.process(path)?;
    let success = outcome.success();

    if format == OutputFormat::Json {
        return Ok(CommandOutput::with_status(to_json(&outcome)?, success));
    }

    let text = match (&outcome.change, &outcome.dispatch) {
        (Some(change), Some(result)) => {
            let mut text = format!("{}: {}\n\n", outcome.path, change);
            text.push_str(&render_dispatch(result));
            if !outcome.committed {
                text.push_str("\nFingerprint not committed; the change will be retried.");
            }
            text
        }
        _ => format!("{}: unchanged", outcome.path),
    };
    Ok(CommandOutput::with_status(text, success))
}
