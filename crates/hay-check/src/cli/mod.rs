//! Command-line interface definition for hay-check.
//!
//! # Command Structure
//!
//! - `hay-check run` - Run the checks against a catalog
//! - `hay-check list` - Print the fixture table
//! - `hay-check validate` - Check the fixture table without a browser

mod commands;

use clap::Parser;

pub use commands::{Command, ListArgs, RunArgs, SourceArgs, ValidateArgs};

/// hay-check - acceptance checks for Archives/Manuscripts request links
#[derive(Parser, Debug)]
#[command(
    name = "hay-check",
    version,
    about = "Browser-driven acceptance checks for Archives/Manuscripts request links",
    long_about = "hay-check loads fixed catalog records and searches in headless Chrome and\n\
                  compares each item's location, call number, status, and request link\n\
                  against a table of expectations."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Also logs the page snapshot each check reads.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
