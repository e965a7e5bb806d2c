//! Registry error types.
//!
//! Uses miette for diagnostic output and thiserror for derive macros.
//! Most of these are recovered locally by the component that raises them and
//! only surface as log lines or structured result fields. Configuration-level
//! errors are the ones expected to reach the caller.

use miette::Diagnostic;
use thiserror::Error;

/// Document registry errors.
#[derive(Error, Diagnostic, Debug)]
pub enum RegistryError {
    #[error("Fingerprint store unavailable at {path}: {message}")]
    #[diagnostic(
        code(docreg::docs::store_unavailable),
        help("The store is treated as empty; every tracked file will be re-detected.")
    )]
    StoreUnavailable { path: String, message: String },

    #[error("Failed to write fingerprint store {path}: {message}")]
    #[diagnostic(code(docreg::docs::store_write))]
    StoreWrite { path: String, message: String },

    #[error("File unreadable: {path}: {message}")]
    #[diagnostic(code(docreg::docs::file_unreadable))]
    FileUnreadable { path: String, message: String },

    #[error("Refresh action '{action}' failed: {message}")]
    #[diagnostic(code(docreg::docs::dispatch_action_failed))]
    DispatchActionFailed { action: String, message: String },

    #[error("Configuration missing: {message}")]
    #[diagnostic(
        code(docreg::docs::configuration_missing),
        help("Check --root / DOCREG_ROOT or the `root` key of docreg.yaml.")
    )]
    ConfigurationMissing { message: String },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
