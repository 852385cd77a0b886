//! On-page request-type and sub-option selection.
//!
//! Harvests the page's visible radio/checkbox-like elements once per step
//! and hands the labels to the pure matchers in [`crate::matcher`]. Clicking
//! a request type usually reveals the sub-option block, so sub-options
//! re-harvest after a short reveal delay.

use crate::definition::{RequestTypeSpec, SubOptionSpec};
use crate::matcher::{match_option, match_sub_option, should_select_option};
use optout_browser::PageHandle;
use optout_sheet::FormRecord;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Delay for conditionally revealed sub-option blocks to render.
const REVEAL_DELAY: Duration = Duration::from_millis(800);

/// Selects request-type and sub-option controls on a page.
pub struct OptionSelector<'a> {
    page: &'a PageHandle,
}

impl<'a> OptionSelector<'a> {
    /// Create a selector over a page.
    #[must_use]
    pub fn new(page: &'a PageHandle) -> Self {
        Self { page }
    }

    /// Pick and click the request-type option for a record.
    ///
    /// Returns the clicked option's label, or `None` when nothing matched.
    pub async fn select_request_type(
        &self,
        spec: &RequestTypeSpec,
        record: &FormRecord,
    ) -> Option<String> {
        let default = spec.default.as_deref().unwrap_or("");
        let request_type = record.value_or(&spec.column, default);
        if request_type.is_empty() {
            warn!("no request type in record and no default configured");
            return None;
        }

        let options = match self.page.harvest_options().await {
            Ok(options) => options,
            Err(e) => {
                warn!(error = %e, "could not harvest option elements");
                return None;
            }
        };

        debug!(request_type, candidates = options.len(), "matching request type");

        let index = match_option(&options, request_type)?;
        let label = options
            .iter()
            .find(|o| o.index == index)
            .map(|o| o.label.clone())
            .unwrap_or_default();

        match self.page.click_option(index).await {
            Ok(()) => {
                info!(request_type, option = %label, "selected request type");
                Some(label)
            }
            Err(e) => {
                warn!(request_type, option = %label, error = %e, "request type click failed");
                None
            }
        }
    }

    /// Select the sub-options whose record cells are truthy.
    ///
    /// Each sub-option is decided independently; returns the names of those
    /// that were clicked.
    pub async fn select_sub_options(
        &self,
        specs: &[SubOptionSpec],
        record: &FormRecord,
    ) -> Vec<String> {
        if specs.is_empty() {
            return Vec::new();
        }

        // Sub-option blocks are revealed by the request-type click
        tokio::time::sleep(REVEAL_DELAY).await;

        let mut selected = Vec::new();
        for spec in specs {
            let cell = record.get(&spec.column).unwrap_or("");
            if !should_select_option(cell) {
                debug!(sub_option = %spec.name, cell, "skipping sub-option");
                continue;
            }

            if self.select_one(spec).await {
                selected.push(spec.name.clone());
            }
        }
        selected
    }

    async fn select_one(&self, spec: &SubOptionSpec) -> bool {
        // Explicit selector cascade first
        if let Ok(Some(selector)) = self.page.first_visible(&spec.selectors).await {
            if self.page.click(selector).await.is_ok() {
                info!(sub_option = %spec.name, selector, "selected sub-option");
                return true;
            }
        }

        // Keyword match over freshly harvested options
        let options = match self.page.harvest_options().await {
            Ok(options) => options,
            Err(e) => {
                warn!(sub_option = %spec.name, error = %e, "could not harvest sub-option elements");
                return false;
            }
        };

        if let Some(index) = match_sub_option(&options, &spec.keywords) {
            match self.page.click_option(index).await {
                Ok(()) => {
                    info!(sub_option = %spec.name, "selected sub-option");
                    return true;
                }
                Err(e) => {
                    warn!(sub_option = %spec.name, error = %e, "sub-option click failed");
                }
            }
        } else {
            warn!(sub_option = %spec.name, "no matching sub-option element");
        }
        false
    }
}
