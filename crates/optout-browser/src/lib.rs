//! Browser automation engine for driving third-party request portals.
//!
//! Provides headless browser control with fingerprint randomization and
//! the page-level primitives the form pipeline is built from: selector
//! cascades, visibility-checked fills and clicks, option-label harvesting,
//! and screenshots.

pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod page;

pub use engine::BrowserEngine;
pub use error::{BrowserError, Result};
pub use fingerprint::FingerprintConfig;
pub use page::{ClickableButton, ElementRect, OptionLabel, PageHandle};
