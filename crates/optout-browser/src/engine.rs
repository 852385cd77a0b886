use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use crate::page::PageHandle;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::stream::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Browser automation engine.
///
/// Owns the Chromium process and its event handler task. One engine drives
/// one page at a time; the batch loop is strictly sequential.
pub struct BrowserEngine {
    browser: Browser,
    handler_task: JoinHandle<()>,
    fingerprint: FingerprintConfig,
    navigation_timeout: Duration,
}

impl BrowserEngine {
    /// Launch a browser from application settings.
    ///
    /// Launch failure is the only fatal error of a batch run.
    pub async fn launch(settings: &optout_core::BrowserConfig) -> Result<Self> {
        let fingerprint = if settings.randomize_fingerprint {
            FingerprintConfig::randomized()
        } else {
            FingerprintConfig::fixed(settings.window_width, settings.window_height)
        };

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(fingerprint.viewport_width, fingerprint.viewport_height);
        if !settings.headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Drain CDP events for the lifetime of the browser
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        debug!(
            user_agent = %fingerprint.user_agent,
            width = fingerprint.viewport_width,
            height = fingerprint.viewport_height,
            "launched browser"
        );

        Ok(Self {
            browser,
            handler_task,
            fingerprint,
            navigation_timeout: Duration::from_secs(settings.navigation_timeout_secs),
        })
    }

    /// Open a new page with the engine's fingerprint applied.
    pub async fn new_page(&self) -> Result<PageHandle> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        page.set_user_agent(self.fingerprint.user_agent.clone())
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        Ok(PageHandle::new(page, self.navigation_timeout))
    }

    /// Shut the browser down, ignoring errors from an already-dead process.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "browser wait failed");
        }
        self.handler_task.abort();
    }
}
