//! Form definition types and structures.
//!
//! This module defines the data structures for portal form variants loaded
//! from TOML files. One definition replaces one of the original per-variant
//! scripts: it carries the target URL, the per-field selector cascades with
//! spreadsheet column mappings and defaults, and the request-type,
//! sub-option, acknowledgment, CAPTCHA, and submit configuration.

use crate::error::{FormError, Result};
use chrono::NaiveDate;
use optout_core::FormId;
use serde::{Deserialize, Serialize};

/// Complete form definition loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefinition {
    /// Core form metadata
    pub form: FormMetadata,

    /// Spreadsheet columns that must be present (combined variant only)
    #[serde(default)]
    pub required_columns: Vec<String>,

    /// Fields to fill, in fill order
    pub fields: Vec<FieldSpec>,

    /// Request-type selection configuration
    pub request_type: RequestTypeSpec,

    /// Conditional sub-options revealed after the request type is chosen
    #[serde(default)]
    pub sub_options: Vec<SubOptionSpec>,

    /// Acknowledgment control configuration
    #[serde(default)]
    pub acknowledgment: AcknowledgmentSpec,

    /// CAPTCHA widget hints
    #[serde(default)]
    pub captcha: CaptchaSpec,

    /// Submit button configuration
    #[serde(default)]
    pub submit: SubmitSpec,
}

impl FormDefinition {
    /// Get the form ID.
    #[must_use]
    pub fn id(&self) -> &FormId {
        &self.form.id
    }

    /// Get the form name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.form.name
    }

    /// Validate the form definition for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        if self.form.name.is_empty() {
            return Err(self.invalid("form name cannot be empty"));
        }

        if self.form.url.is_empty() {
            return Err(self.invalid("form URL cannot be empty"));
        }

        if self.fields.is_empty() {
            return Err(self.invalid("definition must declare at least one field"));
        }

        for field in &self.fields {
            if field.name.is_empty() {
                return Err(self.invalid("field name cannot be empty"));
            }
            if field.selectors.is_empty() {
                return Err(self.invalid(&format!(
                    "field '{}' must have at least one selector candidate",
                    field.name
                )));
            }
            if field.column.is_empty() && field.default.is_none() {
                return Err(self.invalid(&format!(
                    "field '{}' needs a column mapping or a default value",
                    field.name
                )));
            }
        }

        if self.request_type.column.is_empty() && self.request_type.default.is_none() {
            return Err(self.invalid("request_type needs a column mapping or a default value"));
        }

        for sub in &self.sub_options {
            if sub.name.is_empty() {
                return Err(self.invalid("sub-option name cannot be empty"));
            }
            if sub.column.is_empty() {
                return Err(self.invalid(&format!(
                    "sub-option '{}' must map to a spreadsheet column",
                    sub.name
                )));
            }
            if sub.keywords.is_empty() && sub.selectors.is_empty() {
                return Err(self.invalid(&format!(
                    "sub-option '{}' needs keywords or selectors to locate its control",
                    sub.name
                )));
            }
        }

        if self.acknowledgment.selectors.is_empty() && self.acknowledgment.text_patterns.is_empty()
        {
            return Err(self.invalid(
                "acknowledgment needs at least one selector or text pattern",
            ));
        }

        Ok(())
    }

    fn invalid(&self, reason: &str) -> FormError {
        FormError::ValidationError {
            form_id: self.form.id.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Core form metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormMetadata {
    /// Unique form identifier (e.g., "parent", "myself-international")
    pub id: FormId,

    /// Human-readable form name
    pub name: String,

    /// URL of the request portal form
    pub url: String,

    /// Who the request is filed on behalf of
    pub audience: Audience,

    /// Requester locale handled by this variant
    pub region: Region,

    /// Date when this definition was last verified against the live portal (YYYY-MM-DD)
    pub last_verified: NaiveDate,
}

/// Who a request is filed on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Audience {
    /// The data subject themselves
    Myself,
    /// A parent or guardian filing for a child
    Parent,
    /// An educator filing for students
    Educator,
    /// Combined definition handling any audience (master spreadsheet)
    Combined,
}

impl Audience {
    /// Get a human-readable display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Myself => "Myself",
            Self::Parent => "Parent/Guardian",
            Self::Educator => "Educator",
            Self::Combined => "Combined",
        }
    }
}

impl std::str::FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "myself" => Ok(Self::Myself),
            "parent" => Ok(Self::Parent),
            "educator" => Ok(Self::Educator),
            "combined" => Ok(Self::Combined),
            other => Err(format!(
                "unknown audience '{other}' (expected myself, parent, educator, or combined)"
            )),
        }
    }
}

/// Requester locale a form variant handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    /// United States requesters
    Domestic,
    /// Non-US requesters
    International,
    /// Either
    Any,
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "domestic" => Ok(Self::Domestic),
            "international" => Ok(Self::International),
            "any" => Ok(Self::Any),
            other => Err(format!(
                "unknown region '{other}' (expected domestic, international, or any)"
            )),
        }
    }
}

/// One form field: spreadsheet column, ordered selector cascade, default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name for logging and outcomes (e.g., "`first_name`")
    pub name: String,

    /// Spreadsheet column the value comes from (may be empty if `default` is set)
    #[serde(default)]
    pub column: String,

    /// Ordered locator candidates; the first visible match wins
    pub selectors: Vec<String>,

    /// Fallback value when the cell is absent or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Request-type selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestTypeSpec {
    /// Spreadsheet column holding the free-text request type
    #[serde(default)]
    pub column: String,

    /// Fallback request type when the cell is absent or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A conditional sub-option (e.g., which data category to delete).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubOptionSpec {
    /// Sub-option name for logging and outcomes (e.g., "`delete_student`")
    pub name: String,

    /// Spreadsheet column whose truthiness decides selection
    pub column: String,

    /// Keywords matched against on-page option labels
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Optional explicit selector cascade, tried before keyword matching
    #[serde(default)]
    pub selectors: Vec<String>,
}

/// Acknowledgment control configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcknowledgmentSpec {
    /// Ordered selector candidates for the acknowledgment control
    #[serde(default)]
    pub selectors: Vec<String>,

    /// Visible-text patterns to click when no selector matches
    #[serde(default)]
    pub text_patterns: Vec<String>,
}

/// CAPTCHA widget hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptchaSpec {
    /// Selectors indicating a CAPTCHA widget is present
    pub widget_selectors: Vec<String>,

    /// Selectors for the clickable checkbox/anchor
    pub checkbox_selectors: Vec<String>,

    /// Selectors indicating an image/audio challenge is showing
    pub challenge_selectors: Vec<String>,
}

impl Default for CaptchaSpec {
    fn default() -> Self {
        Self {
            widget_selectors: vec![
                "iframe[src*='recaptcha']".to_string(),
                "iframe[title*='reCAPTCHA']".to_string(),
                ".g-recaptcha".to_string(),
                ".h-captcha".to_string(),
            ],
            checkbox_selectors: vec![
                "#recaptcha-anchor".to_string(),
                ".recaptcha-checkbox-border".to_string(),
                ".g-recaptcha".to_string(),
                ".h-captcha".to_string(),
            ],
            challenge_selectors: vec![
                "iframe[src*='bframe']".to_string(),
                "iframe[title*='challenge']".to_string(),
            ],
        }
    }
}

/// Submit button configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitSpec {
    /// Optional explicit selector cascade, tried before button harvesting
    pub selectors: Vec<String>,

    /// Button-text keywords that mark a button as submit-like
    pub button_keywords: Vec<String>,

    /// Success-indicator phrases scanned for after submission
    pub success_texts: Vec<String>,
}

impl Default for SubmitSpec {
    fn default() -> Self {
        Self {
            selectors: Vec::new(),
            button_keywords: vec!["submit".to_string(), "send".to_string()],
            success_texts: vec![
                "thank you".to_string(),
                "request has been received".to_string(),
                "successfully submitted".to_string(),
                "we have received".to_string(),
                "confirmation".to_string(),
            ],
        }
    }
}
