//! CAPTCHA detection and manual-solve waiting.
//!
//! The pipeline never solves challenges itself. It clicks the widget
//! checkbox when one is present, and if a challenge opens it polls for the
//! challenge to disappear so a human at the browser can solve it. An expired
//! wait is reported, not raised: submission is attempted regardless.

use crate::definition::CaptchaSpec;
use crate::error::Result;
use crate::outcome::CaptchaStatus;
use async_trait::async_trait;
use optout_browser::{ElementRect, PageHandle};
use optout_core::CaptchaConfig;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Horizontal offset of the checkbox inside a reCAPTCHA/hCaptcha frame.
const CHECKBOX_INSET_X: f64 = 28.0;

/// Bound on reading the widget frame's geometry; the widget can render late.
const FRAME_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// CAPTCHA solver seam for pluggable implementations.
#[async_trait]
pub trait CaptchaSolver: Send + Sync {
    /// Handle the CAPTCHA step on a page, returning what happened.
    async fn solve(
        &self,
        page: &PageHandle,
        spec: &CaptchaSpec,
        config: &CaptchaConfig,
    ) -> Result<CaptchaStatus>;
}

/// Manual solver: clicks the checkbox and waits for a human to clear any
/// challenge that appears.
pub struct ManualSolver;

#[async_trait]
impl CaptchaSolver for ManualSolver {
    async fn solve(
        &self,
        page: &PageHandle,
        spec: &CaptchaSpec,
        config: &CaptchaConfig,
    ) -> Result<CaptchaStatus> {
        if !detect_captcha(page, spec).await? {
            debug!("no captcha widget detected");
            return Ok(CaptchaStatus::NotDetected);
        }

        click_checkbox(page, spec).await;

        // Give a challenge popup a moment to render before deciding
        tokio::time::sleep(Duration::from_secs(1)).await;

        if !challenge_visible(page, spec).await {
            return Ok(CaptchaStatus::CheckboxClicked);
        }

        info!(
            wait_secs = config.manual_wait_secs,
            "captcha challenge showing, waiting for manual solve"
        );

        let poll = Duration::from_secs(config.poll_interval_secs.max(1));
        let deadline = tokio::time::Instant::now() + Duration::from_secs(config.manual_wait_secs);

        while tokio::time::Instant::now() < deadline {
            tokio::time::sleep(poll).await;
            if !challenge_visible(page, spec).await {
                info!("captcha challenge cleared");
                return Ok(CaptchaStatus::ChallengeSolved);
            }
        }

        warn!("captcha challenge still showing after wait window, proceeding anyway");
        Ok(CaptchaStatus::TimedOut)
    }
}

/// Whether a CAPTCHA widget is present on the page.
pub async fn detect_captcha(page: &PageHandle, spec: &CaptchaSpec) -> Result<bool> {
    Ok(page.first_visible(&spec.widget_selectors).await?.is_some())
}

/// Click the widget checkbox.
///
/// The checkbox lives inside a cross-origin iframe that top-document
/// selectors cannot reach, so the iframe's on-page rectangle is read first
/// and a trusted mouse click is dispatched at the checkbox position inside
/// it. The selector cascade remains as the fallback for same-document
/// widgets.
async fn click_checkbox(page: &PageHandle, spec: &CaptchaSpec) {
    if click_inside_widget_frame(page, spec).await {
        return;
    }

    for selector in &spec.checkbox_selectors {
        match page.click(selector).await {
            Ok(()) => {
                debug!(selector, "clicked captcha checkbox");
                return;
            }
            Err(e) => debug!(selector, error = %e, "captcha checkbox candidate failed"),
        }
    }
    warn!("could not click any captcha checkbox candidate");
}

async fn click_inside_widget_frame(page: &PageHandle, spec: &CaptchaSpec) -> bool {
    for selector in spec.widget_selectors.iter().filter(|s| s.contains("iframe")) {
        let rect = match tokio::time::timeout(FRAME_READ_TIMEOUT, page.element_rect(selector)).await
        {
            Ok(Ok(Some(rect))) => rect,
            Ok(Ok(None)) => continue,
            Ok(Err(e)) => {
                debug!(selector, error = %e, "widget frame rect read failed");
                continue;
            }
            Err(_) => {
                debug!(selector, "widget frame rect read timed out");
                continue;
            }
        };

        let (x, y) = checkbox_point(&rect);
        match page.click_at(x, y).await {
            Ok(()) => {
                debug!(selector, x, y, "clicked captcha checkbox inside widget frame");
                return true;
            }
            Err(e) => debug!(selector, error = %e, "widget frame click failed"),
        }
    }
    false
}

/// Viewport coordinates of the checkbox inside a widget frame's rectangle.
///
/// The checkbox anchors near the frame's left edge at half height; the
/// inset is clamped so a narrow frame still gets an in-bounds point.
fn checkbox_point(rect: &ElementRect) -> (f64, f64) {
    let inset = CHECKBOX_INSET_X.min(rect.width / 2.0);
    (rect.left + inset, rect.top + rect.height / 2.0)
}

async fn challenge_visible(page: &PageHandle, spec: &CaptchaSpec) -> bool {
    for selector in &spec.challenge_selectors {
        if page.is_visible(selector).await.unwrap_or(false) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_solver_is_zero_sized() {
        assert_eq!(std::mem::size_of::<ManualSolver>(), 0);
    }

    #[test]
    fn test_solver_trait_object() {
        let solver: Box<dyn CaptchaSolver> = Box::new(ManualSolver);
        let _ = &solver;
    }

    #[test]
    fn test_checkbox_point_in_standard_frame() {
        // Typical reCAPTCHA anchor frame
        let rect = ElementRect {
            left: 100.0,
            top: 200.0,
            width: 304.0,
            height: 78.0,
        };
        assert_eq!(checkbox_point(&rect), (128.0, 239.0));
    }

    #[test]
    fn test_checkbox_point_clamps_in_narrow_frame() {
        let rect = ElementRect {
            left: 10.0,
            top: 10.0,
            width: 40.0,
            height: 40.0,
        };
        let (x, y) = checkbox_point(&rect);
        assert_eq!((x, y), (30.0, 30.0));
        assert!(x < rect.left + rect.width);
    }
}
