//! Error handling for hay-check.
//!
//! Two families live here:
//!
//! - [`CheckError`] is what a single check produces: an assertion that did
//!   not hold, an element that was not on the page, or a browser failure.
//!   The runner logs it and moves on to the next check.
//! - [`CliError`] is what a command produces: bad configuration, a broken
//!   fixture table, or a run in which checks failed. It is turned into a
//!   miette report at the binary edge.

mod report;

use hay_browser::BrowserError;
use std::path::PathBuf;
use thiserror::Error;

pub use report::cli_error_to_miette;

/// Why a single check failed.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Element text differed from the expected value.
    #[error("{what}: expected `{expected}`, found `{actual}`")]
    Mismatch {
        /// Which element was compared (e.g. "item `item_142740093` status")
        what: String,
        /// Expected text
        expected: String,
        /// Text found on the page
        actual: String,
    },

    /// Element text did not contain an expected fragment.
    #[error("{what}: expected text containing `{expected}`, found `{actual}`")]
    NotContained {
        /// Which element was compared
        what: String,
        /// Fragment that should appear
        expected: String,
        /// Text found on the page
        actual: String,
    },

    /// Element text contained a fragment that must not appear.
    #[error("{what}: `{unexpected}` should not appear, found `{actual}`")]
    Unexpected {
        /// Which element was compared
        what: String,
        /// Fragment that must not appear
        unexpected: String,
        /// Text found on the page
        actual: String,
    },

    /// A DOM lookup found nothing.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// The search returned a different number of result documents.
    #[error("expected {expected} result documents, found {actual}")]
    DocumentCount {
        /// Expected `div.document` count
        expected: usize,
        /// Count found on the page
        actual: usize,
    },

    /// Launching, navigating, waiting, or reading the page failed.
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file doesn't exist
    #[error("Config file not found: {}\n\nHint: Create hay-check.toml or drop --config", .0.display())]
    NotFound(PathBuf),

    /// Sources could not be merged into settings
    #[error("Invalid configuration: {0}\n\nHint: Check hay-check.toml syntax and HAY_CHECK_* variables")]
    Extract(String),

    /// A setting has an unusable value
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the setting
        field: String,
        /// The offending value
        value: String,
        /// How to fix it
        hint: String,
    },
}

/// Fixture table errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixture file could not be read
    #[error("Failed to read fixtures {}: {source}", .path.display())]
    Read {
        /// File that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The fixture file is not a valid table
    #[error("Invalid fixtures in {}: {message}", .path.display())]
    Parse {
        /// File that was parsed
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The table breaks its own contract
    #[error("Fixture table is inconsistent:\n{}", .problems.iter().map(|p| format!("  - {p}")).collect::<Vec<_>>().join("\n"))]
    Invalid {
        /// Every problem found, one per line
        problems: Vec<String>,
    },

    /// `--only` named a check the table doesn't have
    #[error("Unknown check '{name}'\n\nHint: Run 'hay-check list' to see available checks")]
    UnknownCheck {
        /// The requested name
        name: String,
    },
}

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fixture table errors
    #[error("Fixture error: {0}")]
    Fixture(#[from] FixtureError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The run finished with failed or skipped checks
    #[error("{}", checks_failed_line(.failed, .skipped, .total))]
    ChecksFailed {
        /// Number of checks that ran and failed
        failed: usize,
        /// Number of checks `--fail-fast` never started
        skipped: usize,
        /// Number of checks selected for the run
        total: usize,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn checks_failed_line(failed: &usize, skipped: &usize, total: &usize) -> String {
    if *skipped == 0 {
        format!("{failed} of {total} checks failed")
    } else {
        format!("{failed} failed, {skipped} skipped of {total} checks")
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;
