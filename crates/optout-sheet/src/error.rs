//! Error types for spreadsheet loading and reporting.

use thiserror::Error;

/// Errors that can occur in spreadsheet operations.
#[derive(Error, Debug)]
pub enum SheetError {
    /// Failed to open or read a workbook
    #[error("failed to load workbook {path}: {reason}")]
    LoadError {
        /// Path to the workbook
        path: String,
        /// Underlying error description
        reason: String,
    },

    /// Workbook has no worksheets
    #[error("workbook {path} contains no worksheets")]
    NoWorksheets {
        /// Path to the workbook
        path: String,
    },

    /// Worksheet has no header row
    #[error("worksheet '{sheet}' has no header row")]
    EmptyHeader {
        /// Worksheet name
        sheet: String,
    },

    /// Failed to write a run report
    #[error("failed to write report {path}: {reason}")]
    ReportError {
        /// Path to the report
        path: String,
        /// Underlying error description
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for spreadsheet operations.
pub type Result<T> = std::result::Result<T, SheetError>;
