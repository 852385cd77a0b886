//! Error types for the form subsystem.

use thiserror::Error;

/// Errors that can occur in form definition and submission operations.
#[derive(Error, Debug)]
pub enum FormError {
    /// Form definition not found
    #[error("form definition not found: {form_id}")]
    NotFound {
        /// The form ID that was not found
        form_id: String,
    },

    /// Failed to load form definition from file
    #[error("failed to load form definition from {path}: {source}")]
    LoadError {
        /// Path to the definition file
        path: String,
        /// Underlying error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse form definition TOML
    #[error("failed to parse form definition TOML in {path}: {source}")]
    ParseError {
        /// Path to the definition file
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Invalid form definition (validation failed)
    #[error("invalid form definition for {form_id}: {reason}")]
    ValidationError {
        /// Form ID being validated
        form_id: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Form definition directory not found
    #[error("form definitions directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// Browser automation error surfaced during a form step
    #[error("browser error: {0}")]
    Browser(#[from] optout_browser::BrowserError),

    /// I/O error while accessing form definitions
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid form ID format
    #[error("invalid form ID: {0}")]
    InvalidId(#[from] optout_core::OptoutError),
}

/// Result type for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
