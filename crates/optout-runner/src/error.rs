//! Error types for the batch runner.

use thiserror::Error;

/// Errors from batch runs.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Browser-level failure that prevents the batch from running at all
    #[error("browser error: {0}")]
    Browser(#[from] optout_browser::BrowserError),

    /// Form definition failure
    #[error("form error: {0}")]
    Form(#[from] optout_form::FormError),

    /// Spreadsheet failure
    #[error("sheet error: {0}")]
    Sheet(#[from] optout_sheet::SheetError),

    /// Configuration failure
    #[error("config error: {0}")]
    Config(#[from] optout_core::ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
