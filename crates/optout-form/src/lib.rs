//! Optout Form - Form definition system and submission pipeline.
//!
//! This crate owns everything between a loaded spreadsheet record and a
//! submitted portal form. Form definitions are TOML files describing one
//! portal variant: the field selector cascades, the request-type column,
//! sub-option mappings, acknowledgment patterns, CAPTCHA hints, and submit
//! behavior.
//!
//! # Architecture
//!
//! - **Definition types** ([`definition`]): strongly-typed form variant configuration
//! - **Loader** ([`loader`]): TOML file loading from `form-definitions/`
//! - **Registry** ([`registry`]): in-memory cache with lookup by form ID
//! - **Matcher** ([`matcher`]): pure request-type and option matching logic
//! - **Filler** ([`filler`]): generic try-fill over selector cascades
//! - **Options** ([`options`]): on-page request-type and sub-option selection
//! - **Captcha** ([`captcha`]): detection plus bounded manual-solve waiting
//! - **Submit** ([`submit`]): acknowledgment, submit click, success scan
//! - **Outcome** ([`outcome`]): explicit per-field/per-row result types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod captcha;
pub mod definition;
pub mod error;
pub mod filler;
pub mod loader;
pub mod matcher;
pub mod options;
pub mod outcome;
pub mod registry;
pub mod submit;

// Re-export commonly used types
pub use definition::{
    AcknowledgmentSpec, Audience, CaptchaSpec, FieldSpec, FormDefinition, FormMetadata, Region,
    RequestTypeSpec, SubOptionSpec, SubmitSpec,
};
pub use captcha::{detect_captcha, CaptchaSolver, ManualSolver};
pub use error::{FormError, Result};
pub use filler::FieldFiller;
pub use options::OptionSelector;
pub use loader::FormLoader;
pub use matcher::{derive_keywords, match_option, match_sub_option, should_select_option};
pub use outcome::{CaptchaStatus, FieldFillOutcome, RowOutcome, SubmitOutcome};
pub use registry::FormRegistry;
pub use submit::Submitter;
