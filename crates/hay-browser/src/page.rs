//! Page-level browser operations: navigation, scripting, and snapshot reads.

use crate::console::{ConsoleCapture, parse_console_event};
use crate::dom::{self, RecordSnapshot, ResultsSnapshot};
use crate::error::{BrowserError, Result};
use crate::wait::{WaitConfig, wait_for_result};
use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use chromiumoxide::page::Page as ChromePage;
use futures::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A browser tab with console capture and the page's wait strategy.
#[derive(Debug)]
pub struct Page {
    inner: Arc<ChromePage>,
    console: ConsoleCapture,
    wait: WaitConfig,
    console_task: JoinHandle<()>,
}

impl Page {
    /// Wraps a chromiumoxide page and starts console capture.
    pub(crate) fn new(page: ChromePage, wait: WaitConfig) -> Self {
        let console = ConsoleCapture::new();
        let console_clone = console.clone();
        let page_arc = Arc::new(page);

        let page_for_task = page_arc.clone();
        let console_task = tokio::spawn(async move {
            if let Ok(mut events) = page_for_task
                .event_listener::<EventConsoleApiCalled>()
                .await
            {
                while let Some(event) = events.next().await {
                    console_clone.push(parse_console_event(&event));
                }
            }
        });

        Self {
            inner: page_arc,
            console,
            wait,
            console_task,
        }
    }

    /// Returns a handle to the console message capture.
    #[must_use]
    pub fn console(&self) -> &ConsoleCapture {
        &self.console
    }

    /// The wait strategy used by this page's navigation and selector waits.
    #[must_use]
    pub fn wait_config(&self) -> WaitConfig {
        self.wait
    }

    /// Navigates to an absolute URL and waits for `document.readyState`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationFailed` if the page fails to load, or `WaitTimeout`
    /// if it never finishes loading.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("navigating to {}", url);
        self.inner
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        self.wait_for_load().await
    }

    /// Waits for `document.readyState` to become `"complete"`.
    ///
    /// # Errors
    ///
    /// Returns `WaitTimeout` if the document never completes.
    pub async fn wait_for_load(&self) -> Result<()> {
        wait_for_result(
            || {
                let page = self.inner.clone();
                async move {
                    let result = page
                        .evaluate("document.readyState")
                        .await
                        .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))?;

                    Ok(result
                        .value()
                        .and_then(|v| v.as_str())
                        .is_some_and(|s| s == "complete"))
                }
            },
            self.wait,
            "document ready",
        )
        .await
    }

    /// Executes JavaScript in the page and deserializes the result.
    ///
    /// # Errors
    ///
    /// Returns `ScriptExecutionFailed` if the script throws or the result
    /// does not deserialize into `T`.
    pub async fn evaluate<T>(&self, script: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let result = self
            .inner
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))?;

        result
            .into_value()
            .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))
    }

    /// Counts the elements currently matching a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution fails.
    pub async fn count_selector(&self, selector: &str) -> Result<usize> {
        let script = dom::count_script(selector)?;
        self.evaluate(&script).await
    }

    /// Waits until at least one element matches a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns `WaitTimeout` if nothing matches within the page's timeout.
    pub async fn wait_for_selector(&self, selector: &str) -> Result<()> {
        let script = dom::count_script(selector)?;

        wait_for_result(
            || {
                let page = self.inner.clone();
                let script = script.clone();
                async move {
                    let result = page
                        .evaluate(script.as_str())
                        .await
                        .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))?;

                    Ok(result
                        .value()
                        .and_then(serde_json::Value::as_u64)
                        .is_some_and(|n| n > 0))
                }
            },
            self.wait,
            &format!("selector '{selector}'"),
        )
        .await
    }

    /// Reads the bib record view, looking for the given request-link
    /// classes inside each item row.
    ///
    /// # Errors
    ///
    /// Returns an error if the script fails or the snapshot cannot be decoded.
    pub async fn record_snapshot(&self, link_classes: &[&str]) -> Result<RecordSnapshot> {
        let script = dom::record_script(link_classes)?;
        let value: serde_json::Value = self.evaluate(&script).await?;
        dom::decode_record(value)
    }

    /// Reads the search-results view.
    ///
    /// # Errors
    ///
    /// Returns an error if the script fails or the snapshot cannot be decoded.
    pub async fn results_snapshot(&self) -> Result<ResultsSnapshot> {
        let value: serde_json::Value = self.evaluate(&dom::results_script()).await?;
        dom::decode_results(value)
    }

    /// Returns the current page URL.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution fails.
    pub async fn url(&self) -> Result<String> {
        self.evaluate("window.location.href").await
    }

    /// Returns the page title.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution fails.
    pub async fn title(&self) -> Result<String> {
        self.evaluate("document.title").await
    }

    /// Takes a screenshot of the page and returns PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if screenshot capture fails.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        self.inner
            .screenshot(chromiumoxide::page::ScreenshotParams::default())
            .await
            .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))
    }

    /// Closes the page.
    ///
    /// The console listener holds a clone of the inner page, so it is
    /// stopped first; if another clone is still alive the page is left for
    /// the browser to close.
    ///
    /// # Errors
    ///
    /// Returns an error if closing the page fails.
    pub async fn close(self) -> Result<()> {
        self.console_task.abort();
        // Let the aborted task drop its Arc before we try to take ownership
        let _ = self.console_task.await;

        match Arc::try_unwrap(self.inner) {
            Ok(page) => {
                page.close().await.map_err(BrowserError::ChromiumOxide)?;
                Ok(())
            }
            Err(_arc) => {
                warn!("Page::close() called with outstanding references - leaving it to the browser");
                Ok(())
            }
        }
    }
}
