//! Polling waits for page conditions.
//!
//! Catalog pages fill in availability after the initial load, so element
//! lookups have to poll rather than fire once. These helpers re-evaluate a
//! condition at a fixed interval until it holds or the timeout expires, the
//! same contract as a WebDriver implicit wait.

use crate::error::{BrowserError, Result};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::trace;

/// Default timeout for wait operations (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default poll interval for checking conditions (100ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for wait operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Maximum time to wait for the condition.
    pub timeout: Duration,

    /// How often to check if the condition is satisfied.
    pub poll_interval: Duration,
}

impl WaitConfig {
    /// Creates a new wait configuration.
    #[must_use]
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Creates a config with custom timeout and default poll interval.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, DEFAULT_POLL_INTERVAL)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// Waits for a condition that returns a `Result<bool>`.
///
/// ```ignore
/// wait_for_result(
///     || async { Ok(counter.load(Ordering::SeqCst) > 2) },
///     WaitConfig::default(),
///     "counter above two",
/// ).await?;
/// ```
///
/// Errors from the condition are treated as "not yet": a page that is still
/// navigating rejects script evaluation, and that settles by itself. The last
/// such error is folded into the timeout description so a permanently broken
/// condition is still diagnosable.
///
/// # Errors
///
/// Returns `WaitTimeout` when the condition never held.
pub async fn wait_for_result<F, Fut>(
    condition: F,
    config: WaitConfig,
    description: &str,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();
    let mut last_error: Option<String> = None;

    loop {
        match condition().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => {
                trace!("wait '{}' condition errored: {}", description, e);
                last_error = Some(e.to_string());
            }
        }

        if start.elapsed() >= config.timeout {
            let condition = match last_error {
                Some(err) => format!("{description} (last error: {err})"),
                None => description.to_string(),
            };
            return Err(BrowserError::WaitTimeout {
                condition,
                timeout: config.timeout,
            });
        }

        sleep(config.poll_interval).await;
    }
}
