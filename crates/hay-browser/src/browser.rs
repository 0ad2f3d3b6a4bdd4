//! Browser lifecycle management and process control.
//!
//! `TestBrowser` launches Chrome, drives the CDP handler, and hands out pages.
//!
//! # Resource Safety
//!
//! `TestBrowser` implements Drop so the browser process is killed even if a
//! check panics. Callers should still `close()` explicitly on every path; the
//! check runner in `hay-check` does so whether the check passed or failed.
//!
//! Each launch runs on a fresh Chrome profile in a temporary directory owned
//! by the `TestBrowser`. `close()` removes it once Chrome has exited; Drop
//! removes it on the other paths.

use crate::error::{BrowserError, Result};
use crate::page::Page;
use crate::wait::WaitConfig;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Configuration for launching a browser.
#[derive(Debug, Clone)]
pub struct TestBrowserConfig {
    /// Run in headless mode (default: true, unless the `visible` feature is on).
    pub headless: bool,

    /// Browser window size (default: 1920x1080).
    pub window_size: (u32, u32),

    /// Additional Chrome arguments.
    pub args: Vec<String>,

    /// Chrome executable path (None = auto-detect).
    pub chrome_path: Option<String>,

    /// Waiting strategy handed to every page this browser opens.
    pub wait: WaitConfig,
}

impl TestBrowserConfig {
    /// Creates a new config with defaults for headless runs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables visible mode for debugging.
    #[must_use]
    pub fn visible(mut self) -> Self {
        self.headless = false;
        self
    }

    /// Sets a custom window size.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Adds additional Chrome arguments.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args.extend(args);
        self
    }

    /// Uses a specific Chrome executable.
    #[must_use]
    pub fn with_chrome_path(mut self, path: impl Into<String>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    /// Sets the wait strategy for pages opened by this browser.
    #[must_use]
    pub fn with_wait(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Converts to chromiumoxide `BrowserConfig`.
    #[allow(clippy::result_large_err)]
    fn to_browser_config(&self, user_data_dir: &Path) -> Result<BrowserConfig> {
        let mut config = BrowserConfig::builder();

        if self.headless {
            config = config.arg("--headless");
        } else {
            config = config.with_head();
        }

        config = config.arg(format!(
            "--window-size={},{}",
            self.window_size.0, self.window_size.1
        ));

        // A fresh profile per launch keeps Chrome's ProcessSingleton from
        // handing us a browser left over from the previous check.
        config = config.arg(format!("--user-data-dir={}", user_data_dir.display()));

        for arg in &self.args {
            config = config.arg(arg.clone());
        }

        if let Some(path) = &self.chrome_path {
            config = config.chrome_executable(path.clone());
        }

        config.build().map_err(|e| BrowserError::LaunchFailed {
            reason: format!("invalid browser configuration: {e}"),
            source: None,
        })
    }
}

impl Default for TestBrowserConfig {
    fn default() -> Self {
        Self {
            headless: !cfg!(feature = "visible"),
            window_size: (1920, 1080),
            args: vec![
                // Required when user namespaces are unavailable (containers, CI).
                "--no-sandbox".to_string(),
                // Prevents /dev/shm exhaustion in containerized environments
                "--disable-dev-shm-usage".to_string(),
            ],
            chrome_path: None,
            wait: WaitConfig::default(),
        }
    }
}

/// A managed browser instance.
///
/// ```ignore
/// let browser = TestBrowser::launch(TestBrowserConfig::default()).await?;
/// let page = browser.new_page().await?;
/// page.navigate("https://example.com").await?;
/// browser.close().await?;
/// ```
pub struct TestBrowser {
    // Declared before `profile` so the process is killed before its
    // profile directory is removed.
    inner: Arc<Mutex<Option<Browser>>>,
    wait: WaitConfig,
    profile: Option<TempDir>,
}

impl TestBrowser {
    /// Launches a new browser instance with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `LaunchFailed` if Chrome is not installed, not executable,
    /// or fails to start.
    pub async fn launch(config: TestBrowserConfig) -> Result<Self> {
        debug!("Launching browser with config: {:?}", config);

        let profile = tempfile::Builder::new()
            .prefix("hay-check-")
            .tempdir()
            .map_err(|e| BrowserError::LaunchFailed {
                reason: "could not create a browser profile directory".to_string(),
                source: Some(Box::new(e)),
            })?;
        let browser_config = config.to_browser_config(profile.path())?;

        let (browser, mut handler) =
            Browser::launch(browser_config)
                .await
                .map_err(|e| BrowserError::LaunchFailed {
                    reason: "failed to launch Chrome process".to_string(),
                    source: Some(Box::new(e)),
                })?;

        // chromiumoxide only processes CDP events while the handler is polled
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("Browser handler error: {}", e);
                }
            }
        });

        debug!("Browser launched successfully");

        Ok(Self {
            inner: Arc::new(Mutex::new(Some(browser))),
            wait: config.wait,
            profile: Some(profile),
        })
    }

    /// Creates a new browser page (tab).
    ///
    /// # Errors
    ///
    /// Returns `AlreadyClosed` if the browser has been closed.
    pub async fn new_page(&self) -> Result<Page> {
        let browser = self.inner.lock().await;

        let browser = browser.as_ref().ok_or(BrowserError::AlreadyClosed)?;

        let chrome_page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;

        Ok(Page::new(chrome_page, self.wait))
    }

    /// The Chrome profile directory of this launch.
    ///
    /// It is removed when the browser is closed or dropped.
    #[must_use]
    pub fn profile_dir(&self) -> Option<&Path> {
        self.profile.as_ref().map(TempDir::path)
    }

    /// Closes the browser, waits for the Chrome process to exit, and removes
    /// its profile directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser fails to close gracefully. The profile
    /// directory is still removed when `self` drops.
    pub async fn close(mut self) -> Result<()> {
        {
            let mut browser_guard = self.inner.lock().await;

            if let Some(mut browser) = browser_guard.take() {
                debug!("Closing browser gracefully");
                browser
                    .close()
                    .await
                    .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;
                // Reap the child so repeated checks don't pile up zombies
                if let Err(e) = browser.wait().await {
                    debug!("Browser process wait failed: {}", e);
                }
            }
        }

        if let Some(profile) = self.profile.take() {
            let path = profile.path().to_path_buf();
            if let Err(e) = profile.close() {
                warn!("Could not remove browser profile {}: {}", path.display(), e);
            }
        }

        Ok(())
    }

    /// Returns true if the browser has been closed.
    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.is_none()
    }
}

impl Drop for TestBrowser {
    fn drop(&mut self) {
        // chromiumoxide's Browser::drop kills the Chrome process if close()
        // never took it out of the slot.
        if let Ok(guard) = self.inner.try_lock() {
            if guard.is_some() {
                warn!("TestBrowser dropped without explicit close() - forcing shutdown via Drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_config_is_headless_and_sandbox_free() {
        let config = TestBrowserConfig::default();
        assert_eq!(config.headless, !cfg!(feature = "visible"));
        assert!(config.args.iter().any(|a| a == "--no-sandbox"));
        assert!(config.chrome_path.is_none());
    }

    #[test]
    fn builder_methods_accumulate() {
        let config = TestBrowserConfig::new()
            .visible()
            .with_window_size(800, 600)
            .with_args(vec!["--lang=en-US".to_string()])
            .with_chrome_path("/usr/bin/chromium")
            .with_wait(WaitConfig::with_timeout(Duration::from_secs(5)));

        assert!(!config.headless);
        assert_eq!(config.window_size, (800, 600));
        assert!(config.args.iter().any(|a| a == "--lang=en-US"));
        assert!(config.args.iter().any(|a| a == "--no-sandbox"));
        assert_eq!(config.chrome_path.as_deref(), Some("/usr/bin/chromium"));
        assert_eq!(config.wait.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    #[ignore] // Requires Chrome to be installed
    async fn browser_launch_and_close() {
        let browser = TestBrowser::launch(TestBrowserConfig::default())
            .await
            .expect("failed to launch browser");

        assert!(!browser.is_closed().await);

        browser.close().await.expect("failed to close browser");
    }

    #[tokio::test]
    #[ignore] // Requires Chrome to be installed
    async fn close_removes_profile_dir() {
        let browser = TestBrowser::launch(TestBrowserConfig::default())
            .await
            .expect("failed to launch browser");
        let profile = browser.profile_dir().expect("profile").to_path_buf();
        assert!(profile.is_dir());
        assert!(
            profile
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("hay-check-"))
        );

        browser.close().await.expect("failed to close browser");
        assert!(!profile.exists(), "{} was left behind", profile.display());
    }

    #[tokio::test]
    async fn failed_launch_leaves_no_profile_dir() {
        let before = profile_dirs();
        let config = TestBrowserConfig::new().with_chrome_path("/nonexistent/hay-check/chrome");

        let result = TestBrowser::launch(config).await;

        assert!(matches!(result, Err(BrowserError::LaunchFailed { .. })));
        let leaked: Vec<_> = profile_dirs().difference(&before).cloned().collect();
        assert!(leaked.is_empty(), "leaked profiles: {leaked:?}");
    }

    fn profile_dirs() -> std::collections::BTreeSet<std::path::PathBuf> {
        std::fs::read_dir(std::env::temp_dir())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| {
                        p.file_name()
                            .and_then(|n| n.to_str())
                            .is_some_and(|n| n.starts_with("hay-check-"))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
