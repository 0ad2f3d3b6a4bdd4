//! Logging for hay-check.
//!
//! A run's record is its log: each check's goal and URL, the matched row,
//! and the outcome at `info`; snapshots at `debug`. Output goes to stderr so
//! `hay-check list` can be piped.
//!
//! - **Verbosity control**: `--verbose` for debug, `--quiet` for errors only
//! - **Environment filters**: `RUST_LOG` when neither flag is given
//! - **Color support**: automatic, with `--no-color` override
//!
//! ```rust,no_run
//! use hay_check::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("Goal: restricted items cannot be requested");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter for `--verbose`.
pub const VERBOSE_FILTER: &str = "hay_check=debug,hay_browser=debug,chromiumoxide=off";

/// Filter for `--quiet`.
pub const QUIET_FILTER: &str = "hay_check=error,hay_browser=error,chromiumoxide=off";

/// Filter when neither flag nor `RUST_LOG` is given. chromiumoxide logs every
/// unrecognised CDP message at error level, so it stays off.
pub const DEFAULT_FILTER: &str = "hay_check=info,hay_browser=info,chromiumoxide=off";

/// Picks the filter for the given flags.
///
/// The level is determined in this order:
/// 1. `--verbose`: debug for hay crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. [`DEFAULT_FILTER`]
#[must_use]
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .init();
}
