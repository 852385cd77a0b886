//! Explicit outcome types for form steps.
//!
//! Every best-effort step reports what happened as a value instead of a log
//! line, so callers and tests can assert on outcomes. None of these are
//! errors: the batch continues regardless.

use serde::{Deserialize, Serialize};

/// Outcome of filling one field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldFillOutcome {
    /// A selector candidate matched and the value was written
    Filled {
        /// Field name from the definition
        field: String,
        /// The selector that matched
        selector: String,
    },

    /// No selector candidate resolved to a visible element
    NotFound {
        /// Field name from the definition
        field: String,
    },

    /// A candidate matched but writing the value failed
    Error {
        /// Field name from the definition
        field: String,
        /// Failure description
        reason: String,
    },

    /// Nothing to write: cell empty and no default configured
    Skipped {
        /// Field name from the definition
        field: String,
    },
}

impl FieldFillOutcome {
    /// The field this outcome belongs to.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Filled { field, .. }
            | Self::NotFound { field }
            | Self::Error { field, .. }
            | Self::Skipped { field } => field,
        }
    }

    /// Whether the field was filled.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        matches!(self, Self::Filled { .. })
    }
}

/// What happened at the CAPTCHA step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CaptchaStatus {
    /// No CAPTCHA widget detected on the page
    NotDetected,
    /// Checkbox clicked, no challenge appeared
    CheckboxClicked,
    /// A challenge appeared and disappeared within the wait window (human solved it)
    ChallengeSolved,
    /// A challenge was still showing when the wait window expired
    TimedOut,
}

impl CaptchaStatus {
    /// Whether the step ended without a standing challenge.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        !matches!(self, Self::TimedOut)
    }
}

/// Outcome of the submit step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Clicked submit and a success phrase appeared afterwards
    SuccessIndicated,

    /// Clicked submit; no success phrase found. Submission against a
    /// third-party page is fundamentally unverifiable, so this is not a
    /// failure.
    SubmittedUnconfirmed,

    /// No submit-like button was found on the page
    ButtonNotFound,

    /// The click itself failed
    Failed {
        /// Failure description
        reason: String,
    },
}

impl SubmitOutcome {
    /// Whether the submit click happened at all.
    #[must_use]
    pub fn was_clicked(&self) -> bool {
        matches!(self, Self::SuccessIndicated | Self::SubmittedUnconfirmed)
    }

    /// Short label for reports and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::SuccessIndicated => "submitted (success text found)",
            Self::SubmittedUnconfirmed => "submitted (unconfirmed)",
            Self::ButtonNotFound => "submit button not found",
            Self::Failed { .. } => "submit failed",
        }
    }
}

/// Aggregated outcome of one record's processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowOutcome {
    /// Zero-based record index
    pub record: usize,
    /// Per-field fill outcomes, in fill order
    pub fields: Vec<FieldFillOutcome>,
    /// Label of the request-type option that was clicked, if any
    pub request_type_selected: Option<String>,
    /// Names of sub-options that were selected
    pub sub_options_selected: Vec<String>,
    /// Whether the acknowledgment control was clicked
    pub acknowledged: bool,
    /// CAPTCHA step status
    pub captcha: CaptchaStatus,
    /// Submit step outcome
    pub submit: SubmitOutcome,
    /// Row-scope error that aborted the row early, if any
    pub error: Option<String>,
}

impl RowOutcome {
    /// A row outcome representing an early row-scope failure.
    #[must_use]
    pub fn failed(record: usize, error: impl Into<String>) -> Self {
        Self {
            record,
            fields: Vec::new(),
            request_type_selected: None,
            sub_options_selected: Vec::new(),
            acknowledged: false,
            captcha: CaptchaStatus::NotDetected,
            submit: SubmitOutcome::Failed {
                reason: "row aborted".to_string(),
            },
            error: Some(error.into()),
        }
    }

    /// Number of fields that were filled.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_filled()).count()
    }

    /// Number of fields with no matching selector.
    #[must_use]
    pub fn not_found_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| matches!(f, FieldFillOutcome::NotFound { .. }))
            .count()
    }

    /// Short label for reports.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.error {
            Some(e) => format!("row error: {e}"),
            None => self.submit.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_outcome_accessors() {
        let filled = FieldFillOutcome::Filled {
            field: "email".to_string(),
            selector: "input[type='email']".to_string(),
        };
        assert!(filled.is_filled());
        assert_eq!(filled.field(), "email");

        let missing = FieldFillOutcome::NotFound {
            field: "phone".to_string(),
        };
        assert!(!missing.is_filled());
        assert_eq!(missing.field(), "phone");
    }

    #[test]
    fn test_captcha_status_clear() {
        assert!(CaptchaStatus::NotDetected.is_clear());
        assert!(CaptchaStatus::ChallengeSolved.is_clear());
        assert!(!CaptchaStatus::TimedOut.is_clear());
    }

    #[test]
    fn test_submit_outcome_clicked() {
        assert!(SubmitOutcome::SuccessIndicated.was_clicked());
        assert!(SubmitOutcome::SubmittedUnconfirmed.was_clicked());
        assert!(!SubmitOutcome::ButtonNotFound.was_clicked());
        assert!(!SubmitOutcome::Failed {
            reason: "x".to_string()
        }
        .was_clicked());
    }

    #[test]
    fn test_row_outcome_counts() {
        let outcome = RowOutcome {
            record: 0,
            fields: vec![
                FieldFillOutcome::Filled {
                    field: "a".to_string(),
                    selector: "#a".to_string(),
                },
                FieldFillOutcome::NotFound {
                    field: "b".to_string(),
                },
                FieldFillOutcome::Skipped {
                    field: "c".to_string(),
                },
            ],
            request_type_selected: Some("Delete my data".to_string()),
            sub_options_selected: vec![],
            acknowledged: true,
            captcha: CaptchaStatus::NotDetected,
            submit: SubmitOutcome::SubmittedUnconfirmed,
            error: None,
        };
        assert_eq!(outcome.filled_count(), 1);
        assert_eq!(outcome.not_found_count(), 1);
        assert_eq!(outcome.label(), "submitted (unconfirmed)");
    }

    #[test]
    fn test_row_outcome_failed() {
        let outcome = RowOutcome::failed(3, "navigation failed");
        assert_eq!(outcome.record, 3);
        assert!(outcome.label().contains("navigation failed"));
        assert!(!outcome.submit.was_clicked());
    }
}
