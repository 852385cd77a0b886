//! Page-level primitives for form automation.
//!
//! Every operation here is best-effort against a third-party DOM the code
//! does not control: callers pass ordered selector cascades and get back the
//! first visible match, or nothing. Option and button discovery runs in-page
//! JavaScript that tags matched elements with a `data-optout-*` index so a
//! later click can address exactly the element that was labeled.

use crate::error::{BrowserError, Result};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType, MouseButton,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// A visible radio/checkbox-like element and its derived label.
///
/// The label is taken from `aria-label`, an associated `<label for>`, an
/// enclosing label, or nearby text, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionLabel {
    /// Index assigned by the harvest pass (`data-optout-idx` attribute)
    pub index: usize,
    /// Derived label text
    pub label: String,
    /// Whether the element is enabled
    pub enabled: bool,
}

/// A visible submit-like button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickableButton {
    /// Index assigned by the harvest pass (`data-optout-submit` attribute)
    pub index: usize,
    /// Button text or value
    pub text: String,
    /// Whether the button is enabled
    pub enabled: bool,
}

/// Viewport-relative bounding rectangle of an on-page element.
///
/// Used to address elements inside cross-origin frames (CAPTCHA widgets),
/// which top-document selectors cannot reach: the frame element's rect on
/// the top document gives coordinates for a trusted mouse click.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
    /// Distance from the viewport's left edge
    pub left: f64,
    /// Distance from the viewport's top edge
    pub top: f64,
    /// Rendered width
    pub width: f64,
    /// Rendered height
    pub height: f64,
}

/// Handle to one browser page with bounded-timeout operations.
pub struct PageHandle {
    page: Page,
    navigation_timeout: Duration,
}

impl PageHandle {
    pub(crate) fn new(page: Page, navigation_timeout: Duration) -> Self {
        Self {
            page,
            navigation_timeout,
        }
    }

    /// Navigate to a URL and wait (bounded) for the load to settle.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        tokio::time::timeout(self.navigation_timeout, self.page.goto(url))
            .await
            .map_err(|_| BrowserError::Timeout(format!("navigation to {url}")))?
            .map_err(|e| BrowserError::NavigationError(e.to_string()))?;

        // Load events can straggle; a failed wait is not fatal
        if let Err(e) = tokio::time::timeout(
            self.navigation_timeout,
            self.page.wait_for_navigation(),
        )
        .await
        {
            debug!(url, error = %e, "navigation wait expired");
        }
        Ok(())
    }

    /// Wait (bounded) for any in-flight navigation after a click, then sleep
    /// a fixed settle period. Neither wait failing is an error.
    pub async fn settle_after_submit(&self, sleep: Duration) {
        if tokio::time::timeout(self.navigation_timeout, self.page.wait_for_navigation())
            .await
            .is_err()
        {
            debug!("post-submit navigation wait expired");
        }
        tokio::time::sleep(sleep).await;
    }

    /// Whether a selector resolves to at least one visible element.
    pub async fn is_visible(&self, selector: &str) -> Result<bool> {
        let js = format!(
            r"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                const style = window.getComputedStyle(el);
                if (style.display === 'none' || style.visibility === 'hidden') return false;
                const rect = el.getBoundingClientRect();
                return rect.width > 0 && rect.height > 0;
            }})()",
            sel = js_string(selector)
        );
        self.eval(&js).await
    }

    /// First selector in the cascade that resolves to a visible element.
    pub async fn first_visible<'a>(&self, candidates: &'a [String]) -> Result<Option<&'a str>> {
        for selector in candidates {
            match self.is_visible(selector).await {
                Ok(true) => return Ok(Some(selector)),
                Ok(false) => {}
                Err(e) => debug!(selector, error = %e, "visibility check failed"),
            }
        }
        Ok(None)
    }

    /// Type a value into the element behind a selector.
    ///
    /// Clicks to focus and types through the CDP input domain; if that
    /// fails, falls back to setting `value` directly and dispatching input
    /// events so framework-bound fields still register the change.
    pub async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        match self.page.find_element(selector).await {
            Ok(element) => {
                let typed = async {
                    element
                        .click()
                        .await
                        .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
                    element
                        .type_str(value)
                        .await
                        .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
                    Ok::<(), BrowserError>(())
                }
                .await;

                if let Err(e) = typed {
                    debug!(selector, error = %e, "typing failed, setting value via script");
                    self.set_value_via_script(selector, value).await?;
                }
                Ok(())
            }
            Err(_) => self.set_value_via_script(selector, value).await,
        }
    }

    async fn set_value_via_script(&self, selector: &str, value: &str) -> Result<()> {
        let js = format!(
            r"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.value = {val};
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()",
            sel = js_string(selector),
            val = js_string(value)
        );
        if self.eval::<bool>(&js).await? {
            Ok(())
        } else {
            Err(BrowserError::SelectorNotFound(selector.to_string()))
        }
    }

    /// Bounding rectangle of the first visible element behind a selector.
    pub async fn element_rect(&self, selector: &str) -> Result<Option<ElementRect>> {
        let js = format!(
            r"(() => {{
                const el = document.querySelector({sel});
                if (!el) return null;
                const rect = el.getBoundingClientRect();
                if (rect.width === 0 && rect.height === 0) return null;
                return {{ left: rect.left, top: rect.top, width: rect.width, height: rect.height }};
            }})()",
            sel = js_string(selector)
        );
        self.eval(&js).await
    }

    /// Dispatch a trusted left-click at viewport coordinates.
    ///
    /// This is the only way to hit controls inside cross-origin frames,
    /// whose documents top-level selectors and scripts cannot reach.
    pub async fn click_at(&self, x: f64, y: f64) -> Result<()> {
        let move_params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseMoved)
            .x(x)
            .y(y)
            .build()
            .map_err(BrowserError::ChromiumError)?;
        self.page
            .execute(move_params)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let down_params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MousePressed)
            .x(x)
            .y(y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(BrowserError::ChromiumError)?;
        self.page
            .execute(down_params)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let up_params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseReleased)
            .x(x)
            .y(y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(BrowserError::ChromiumError)?;
        self.page
            .execute(up_params)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        debug!(x, y, "dispatched mouse click");
        Ok(())
    }

    /// Click the element behind a selector, falling back to a script click.
    pub async fn click(&self, selector: &str) -> Result<()> {
        if let Ok(element) = self.page.find_element(selector).await {
            if element.click().await.is_ok() {
                return Ok(());
            }
        }

        let js = format!(
            r"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.click();
                return true;
            }})()",
            sel = js_string(selector)
        );
        if self.eval::<bool>(&js).await? {
            Ok(())
        } else {
            Err(BrowserError::SelectorNotFound(selector.to_string()))
        }
    }

    /// Collect all visible radio/checkbox-like elements with derived labels.
    ///
    /// Radio inputs are often visually hidden behind styled labels, so a
    /// hidden input with an associated label is still included.
    pub async fn harvest_options(&self) -> Result<Vec<OptionLabel>> {
        let js = r#"(() => {
            const nodes = Array.from(document.querySelectorAll(
                "input[type='radio'], input[type='checkbox'], [role='radio'], [role='checkbox']"
            ));
            const found = [];
            let idx = 0;
            for (const el of nodes) {
                const style = window.getComputedStyle(el);
                const rect = el.getBoundingClientRect();
                const hidden = style.display === 'none' || style.visibility === 'hidden'
                    || (rect.width === 0 && rect.height === 0);
                let label = el.getAttribute('aria-label') || '';
                if (!label && el.id) {
                    const forLabel = document.querySelector('label[for="' + el.id + '"]');
                    if (forLabel) label = forLabel.innerText;
                }
                if (!label) {
                    const wrap = el.closest('label');
                    if (wrap) label = wrap.innerText;
                }
                if (!label && el.parentElement) {
                    label = el.parentElement.innerText;
                }
                label = (label || '').replace(/\s+/g, ' ').trim();
                if (hidden && !label) continue;
                el.setAttribute('data-optout-idx', String(idx));
                found.push({ index: idx, label: label, enabled: !el.disabled });
                idx += 1;
            }
            return found;
        })()"#;
        self.eval(js).await
    }

    /// Click an option previously tagged by [`harvest_options`](Self::harvest_options).
    pub async fn click_option(&self, index: usize) -> Result<()> {
        self.click(&format!("[data-optout-idx='{index}']")).await
    }

    /// Collect all visible submit-like buttons.
    pub async fn harvest_buttons(&self) -> Result<Vec<ClickableButton>> {
        let js = r#"(() => {
            const nodes = Array.from(document.querySelectorAll(
                "button, input[type='submit'], input[type='button'], [role='button']"
            ));
            const found = [];
            let idx = 0;
            for (const el of nodes) {
                const style = window.getComputedStyle(el);
                const rect = el.getBoundingClientRect();
                if (style.display === 'none' || style.visibility === 'hidden') continue;
                if (rect.width === 0 && rect.height === 0) continue;
                const text = (el.innerText || el.value || '').replace(/\s+/g, ' ').trim();
                el.setAttribute('data-optout-submit', String(idx));
                found.push({ index: idx, text: text, enabled: !el.disabled });
                idx += 1;
            }
            return found;
        })()"#;
        self.eval(js).await
    }

    /// Click a button previously tagged by [`harvest_buttons`](Self::harvest_buttons).
    pub async fn click_button(&self, index: usize) -> Result<()> {
        self.click(&format!("[data-optout-submit='{index}']")).await
    }

    /// Click the first visible clickable whose text contains one of the
    /// patterns (case-insensitive). Scans buttons, labels, and links.
    pub async fn click_by_text(&self, patterns: &[String]) -> Result<bool> {
        let patterns_json = serde_json::to_string(patterns)
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))?;
        let js = format!(
            r#"(() => {{
                const patterns = {patterns_json}.map(p => p.toLowerCase());
                const nodes = Array.from(document.querySelectorAll(
                    "button, label, a, span[role='button'], input[type='checkbox']"
                ));
                for (const el of nodes) {{
                    const style = window.getComputedStyle(el);
                    const rect = el.getBoundingClientRect();
                    if (style.display === 'none' || style.visibility === 'hidden') continue;
                    if (rect.width === 0 && rect.height === 0) continue;
                    const text = (el.innerText || el.getAttribute('aria-label') || '').toLowerCase();
                    if (patterns.some(p => text.includes(p))) {{
                        el.click();
                        return true;
                    }}
                }}
                return false;
            }})()"#
        );
        self.eval(&js).await
    }

    /// Full visible text of the page body.
    pub async fn body_text(&self) -> Result<String> {
        self.eval(r"(document.body && document.body.innerText) || ''")
            .await
    }

    /// Close the page's browser target.
    ///
    /// Dropping a page leaves its tab open in the browser, so the batch
    /// loop closes each page when its record is done. Errors from an
    /// already-gone target are logged and ignored.
    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            debug!(error = %e, "page close failed");
        }
    }

    /// Save a full-page PNG screenshot.
    pub async fn screenshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(dir = %parent.display(), error = %e, "could not create screenshot directory");
            }
        }

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();

        self.page
            .save_screenshot(params, path)
            .await
            .map_err(|e| BrowserError::ScreenshotError(e.to_string()))?;
        debug!(path = %path.display(), "saved screenshot");
        Ok(())
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, js: &str) -> Result<T> {
        self.page
            .evaluate(js)
            .await
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))
    }
}

/// Quote a string as a JavaScript string literal.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""))
}
