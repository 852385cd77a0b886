//! Optout Core - Foundation crate for the optout batch submitter.
//!
//! This crate provides shared types, error handling, and configuration
//! management that the other optout crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`FormId`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BatchConfig, BrowserConfig, CaptchaConfig, PathsConfig};
pub use error::{ConfigError, ConfigResult, OptoutError, Result};
pub use types::FormId;
