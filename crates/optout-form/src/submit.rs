//! Acknowledgment clicking and form submission.

use crate::definition::{AcknowledgmentSpec, SubmitSpec};
use crate::outcome::SubmitOutcome;
use optout_browser::{ClickableButton, PageHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Clicks the acknowledgment control and the submit button.
pub struct Submitter<'a> {
    page: &'a PageHandle,
}

impl<'a> Submitter<'a> {
    /// Create a submitter over a page.
    #[must_use]
    pub fn new(page: &'a PageHandle) -> Self {
        Self { page }
    }

    /// Click the acknowledgment control: selector cascade first, then
    /// visible-text patterns. Returns whether anything was clicked.
    pub async fn acknowledge(&self, spec: &AcknowledgmentSpec) -> bool {
        if let Ok(Some(selector)) = self.page.first_visible(&spec.selectors).await {
            if self.page.click(selector).await.is_ok() {
                debug!(selector, "clicked acknowledgment");
                return true;
            }
        }

        if !spec.text_patterns.is_empty() {
            match self.page.click_by_text(&spec.text_patterns).await {
                Ok(true) => {
                    debug!("clicked acknowledgment by text pattern");
                    return true;
                }
                Ok(false) => {}
                Err(e) => warn!(error = %e, "acknowledgment text scan failed"),
            }
        }

        warn!("no acknowledgment control found");
        false
    }

    /// Find and click a submit-like button, wait for the page to settle,
    /// then scan for a success phrase.
    ///
    /// Preference order: explicit selector cascade, then an enabled visible
    /// button whose text contains a submit keyword, then a force-click on a
    /// disabled submit-like button. A button without submit-like text is
    /// never clicked. Absence of a success phrase is not a failure; a
    /// missing button is reported per row and the batch goes on.
    pub async fn submit(&self, spec: &SubmitSpec, post_sleep: Duration) -> SubmitOutcome {
        if let Ok(Some(selector)) = self.page.first_visible(&spec.selectors).await {
            match self.page.click(selector).await {
                Ok(()) => {
                    info!(selector, "clicked submit");
                    return self.confirm(spec, post_sleep).await;
                }
                Err(e) => {
                    warn!(selector, error = %e, "explicit submit selector failed");
                }
            }
        }

        let buttons = match self.page.harvest_buttons().await {
            Ok(buttons) => buttons,
            Err(e) => {
                return SubmitOutcome::Failed {
                    reason: format!("button harvest failed: {e}"),
                }
            }
        };

        let Some(button) = pick_submit_button(&buttons, &spec.button_keywords) else {
            warn!("no submit-like button found");
            return SubmitOutcome::ButtonNotFound;
        };

        if !button.enabled {
            warn!(text = %button.text, "no enabled submit button, force-clicking");
        }

        match self.page.click_button(button.index).await {
            Ok(()) => {
                info!(text = %button.text, "clicked submit");
                self.confirm(spec, post_sleep).await
            }
            Err(e) => SubmitOutcome::Failed {
                reason: format!("submit click failed: {e}"),
            },
        }
    }

    async fn confirm(&self, spec: &SubmitSpec, post_sleep: Duration) -> SubmitOutcome {
        self.page.settle_after_submit(post_sleep).await;

        let body = match self.page.body_text().await {
            Ok(body) => body.to_lowercase(),
            Err(e) => {
                debug!(error = %e, "could not read page text after submit");
                return SubmitOutcome::SubmittedUnconfirmed;
            }
        };

        let found = spec
            .success_texts
            .iter()
            .any(|t| body.contains(&t.to_lowercase()));

        if found {
            info!("success indicator found after submit");
            SubmitOutcome::SuccessIndicated
        } else {
            // Not an error: the portal's response page is outside our control
            info!("no success indicator found after submit");
            SubmitOutcome::SubmittedUnconfirmed
        }
    }
}

/// Pick the button to submit with: an enabled button with submit-like text,
/// else a disabled one (force-clicked by the caller). A button whose text
/// matches no keyword is never a candidate, whatever its state.
fn pick_submit_button<'a>(
    buttons: &'a [ClickableButton],
    button_keywords: &[String],
) -> Option<&'a ClickableButton> {
    let keywords: Vec<String> = button_keywords.iter().map(|k| k.to_lowercase()).collect();
    let is_submit_like = |text: &str| {
        let text = text.to_lowercase();
        keywords.iter().any(|k| text.contains(k))
    };

    buttons
        .iter()
        .find(|b| b.enabled && is_submit_like(&b.text))
        .or_else(|| buttons.iter().find(|b| is_submit_like(&b.text)))
}
