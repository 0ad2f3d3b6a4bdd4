//! hay-check - acceptance checks for Archives/Manuscripts item display.
//!
//! Each check loads a fixed catalog record or search-results page in a
//! headless browser and compares the item rows against hand-written
//! expectations: location, call number, status, and which request link (if
//! any) the catalog offers. The checks are data: one [`fixtures::FixtureTable`]
//! row per record or search, run by one generic routine.
//!
//! # Architecture
//!
//! - [`fixtures`] - The expectation table, its TOML form, and its contract
//! - [`assertions`] - Pure comparisons of page snapshots against expectations
//! - [`runner`] - Sequential execution with one scoped browser per check
//! - [`config`] - Layered settings (defaults, file, environment, flags)
//! - [`error`] - Error types and miette reporting
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Terminal status output
//! - `cli` / `commands` - The `hay-check` binary surface
//!
//! # Example
//!
//! ```rust,no_run
//! use hay_check::config::Settings;
//! use hay_check::fixtures::FixtureTable;
//! use hay_check::runner::{run_all, RunOptions};
//!
//! # async fn demo() {
//! let settings = Settings::default();
//! let table = FixtureTable::builtin();
//! let summary = run_all(&settings, &table, &RunOptions::default()).await;
//! println!("{} of {} checks passed", summary.passed(), summary.total());
//! # }
//! ```

pub mod assertions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod logger;
pub mod runner;
pub mod ui;

// Re-export commonly used types
pub use error::{CheckError, CliError, ConfigError, FixtureError, Result};
