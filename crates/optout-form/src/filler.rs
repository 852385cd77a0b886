//! Generic try-fill over selector cascades.
//!
//! One routine replaces the per-field copy-paste of the original scripts:
//! for each field, walk its ordered locator candidates, write into the first
//! visible match, and report the result as a value. A field with no match is
//! a warning, never an abort.

use crate::definition::FieldSpec;
use crate::outcome::FieldFillOutcome;
use optout_browser::PageHandle;
use optout_sheet::FormRecord;
use std::time::Duration;
use tracing::{debug, warn};

/// Fills form fields from a record, one selector cascade at a time.
pub struct FieldFiller<'a> {
    page: &'a PageHandle,
    settle: Duration,
}

impl<'a> FieldFiller<'a> {
    /// Create a filler over a page with a fixed settle sleep between fields.
    #[must_use]
    pub fn new(page: &'a PageHandle, settle: Duration) -> Self {
        Self { page, settle }
    }

    /// Fill every field in definition order. Never fails the row.
    pub async fn fill_fields(
        &self,
        fields: &[FieldSpec],
        record: &FormRecord,
    ) -> Vec<FieldFillOutcome> {
        let mut outcomes = Vec::with_capacity(fields.len());
        for field in fields {
            outcomes.push(self.fill_field(field, record).await);
            tokio::time::sleep(self.settle).await;
        }
        outcomes
    }

    /// Fill a single field: first visible candidate wins.
    pub async fn fill_field(&self, field: &FieldSpec, record: &FormRecord) -> FieldFillOutcome {
        let default = field.default.as_deref().unwrap_or("");
        let value = record.value_or(&field.column, default);

        if value.is_empty() {
            debug!(field = %field.name, column = %field.column, "no value and no default, skipping");
            return FieldFillOutcome::Skipped {
                field: field.name.clone(),
            };
        }

        let matched = match self.page.first_visible(&field.selectors).await {
            Ok(m) => m,
            Err(e) => {
                warn!(field = %field.name, error = %e, "selector check failed");
                return FieldFillOutcome::Error {
                    field: field.name.clone(),
                    reason: e.to_string(),
                };
            }
        };

        let Some(selector) = matched else {
            warn!(
                field = %field.name,
                candidates = field.selectors.len(),
                "no selector candidate matched"
            );
            return FieldFillOutcome::NotFound {
                field: field.name.clone(),
            };
        };

        match self.page.fill(selector, value).await {
            Ok(()) => {
                debug!(field = %field.name, selector, "filled field");
                FieldFillOutcome::Filled {
                    field: field.name.clone(),
                    selector: selector.to_string(),
                }
            }
            Err(e) => {
                warn!(field = %field.name, selector, error = %e, "fill failed");
                FieldFillOutcome::Error {
                    field: field.name.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_value_resolution_prefers_record() {
        // Pure resolution logic exercised without a page: the filler reads
        // record value first, definition default second.
        let field = FieldSpec {
            name: "first_name".to_string(),
            column: "First Name".to_string(),
            selectors: vec!["#fn".to_string()],
            default: Some("John".to_string()),
        };

        let mut values = HashMap::new();
        values.insert("First Name".to_string(), "Alice".to_string());
        let record = FormRecord::new(0, values);
        assert_eq!(
            record.value_or(&field.column, field.default.as_deref().unwrap_or("")),
            "Alice"
        );

        let empty = FormRecord::new(0, HashMap::new());
        assert_eq!(
            empty.value_or(&field.column, field.default.as_deref().unwrap_or("")),
            "John"
        );
    }
}
