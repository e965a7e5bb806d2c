use crate::cli::error::CliResult;
use crate::cli::utils::{CommandOutput, OutputFormat, apply_table_style, to_json};
use crate::context::RegistryContext;
use crate::standards::StandardsEntry;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct StandardsDisplay {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Standards")]
    standards: String,
}

/// List the standards side-table, optionally for one component.
pub fn standards(
    ctx: &RegistryContext,
    component: Option<&str>,
    format: OutputFormat,
) -> CliResult<CommandOutput> {
    let entries: Vec<StandardsEntry> = ctx
        .standards()
        .entries()
        .into_iter()
        .filter(|e| component.is_none_or(|c| e.component == c))
        .collect();

    if format == OutputFormat::Json {
        return Ok(CommandOutput::ok(to_json(&entries)?));
    }

    if entries.is_empty() {
        return Ok(CommandOutput::ok("No standards registered".to_string()));
    }

    let rows: Vec<StandardsDisplay> = entries
        .iter()
        .map(|e| StandardsDisplay {
            component: e.component.clone(),
            standards: e.standards.join(", "),
        })
        .collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    Ok(CommandOutput::ok(table.to_string()))
}
