//! Settings for a check run with multi-source loading.
//!
//! Merges built-in defaults, `hay-check.toml`, `HAY_CHECK_*` environment
//! variables and command-line flags.
//! Priority: CLI > Environment > File > Defaults

mod loading;
mod validation;

use hay_browser::{StaticCatalog, TestBrowserConfig, WaitConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use loading::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use validation::validate_root_url;

/// Catalog root used when nothing else is configured.
pub const DEFAULT_ROOT_URL: &str = "https://search.library.brown.edu/catalog";

/// Default element wait, in seconds.
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 10;

/// Run settings, loaded from `hay-check.toml`, the environment, or flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Catalog root the checks run against
    pub root_url: String,

    /// Production catalog root used to warm availability caches
    pub production_root_url: String,

    /// How long to wait for catalog elements to appear
    pub wait_timeout_secs: u64,

    /// Extra pause after the page's elements appear, before reading it
    #[serde(default)]
    pub settle_millis: u64,

    /// Run Chrome without a window
    pub headless: bool,

    /// Chrome executable (auto-detected when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    /// Fixture table to use instead of the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixtures: Option<PathBuf>,

    /// Where to save a PNG of the page when a check fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            production_root_url: DEFAULT_ROOT_URL.to_string(),
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            settle_millis: 0,
            headless: !cfg!(feature = "visible"),
            chrome_path: None,
            fixtures: None,
            screenshot_dir: None,
        }
    }
}

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overrides {
    /// `--root-url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_url: Option<String>,

    /// `--production-root-url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_root_url: Option<String>,

    /// `--wait-timeout`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_timeout_secs: Option<u64>,

    /// `--settle-millis`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle_millis: Option<u64>,

    /// `--headed` sets this to false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headless: Option<bool>,

    /// `--chrome-path`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    /// `--fixtures`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixtures: Option<PathBuf>,

    /// `--screenshot-dir`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_dir: Option<PathBuf>,
}

impl Settings {
    /// Element wait as a duration.
    #[must_use]
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// Post-load pause as a duration.
    #[must_use]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }

    /// Wait strategy for every page a check opens.
    #[must_use]
    pub fn wait_config(&self) -> WaitConfig {
        WaitConfig::with_timeout(self.wait_timeout())
    }

    /// Browser launch options.
    #[must_use]
    pub fn browser_config(&self) -> TestBrowserConfig {
        let mut config = TestBrowserConfig {
            headless: self.headless,
            ..TestBrowserConfig::default()
        }
        .with_wait(self.wait_config());

        if let Some(path) = &self.chrome_path {
            config = config.with_chrome_path(path.to_string_lossy());
        }
        config
    }

    /// The catalog under test.
    #[must_use]
    pub fn site(&self) -> StaticCatalog {
        StaticCatalog::new(self.root_url.clone())
    }

    /// The production catalog, for cache warm-up.
    #[must_use]
    pub fn production_site(&self) -> StaticCatalog {
        StaticCatalog::new(self.production_root_url.clone())
    }
}
