use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::docs::RegistryError;
use crate::history::JsonlError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read dispatch history: {0}")]
    #[diagnostic(code(docreg::cli::history))]
    History(#[from] JsonlError),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(docreg::cli::serialize))]
    Serialize(#[from] serde_json::Error),

    #[error("Unknown output format '{0}'")]
    #[diagnostic(code(docreg::cli::unknown_format), help("Use 'table' or 'json'."))]
    UnknownFormat(String),
}

pub type CliResult<T> = Result<T, CliError>;
