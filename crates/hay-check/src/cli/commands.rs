use crate::config::Overrides;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available hay-check subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run checks against the catalog
    ///
    /// Each check launches its own headless Chrome, loads one record or
    /// search page, and compares the item rows against the fixture table.
    /// Exits non-zero if any check fails.
    Run(RunArgs),

    /// Print the fixture table
    List(ListArgs),

    /// Check the fixture table for consistency without launching a browser
    Validate(ValidateArgs),
}

/// Where settings and fixtures come from; shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Settings file (default: ./hay-check.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fixture table in TOML (default: the built-in table)
    #[arg(short, long, value_name = "FILE")]
    pub fixtures: Option<PathBuf>,
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Run only the named check (repeatable)
    ///
    /// Examples:
    ///   hay-check run --only yoken-record
    ///   hay-check run --only beckwith-search --only yoken-search
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,

    /// Catalog root to check
    #[arg(long, value_name = "URL")]
    pub root_url: Option<String>,

    /// Production catalog root used to warm availability caches
    #[arg(long, value_name = "URL")]
    pub production_root_url: Option<String>,

    /// Seconds to wait for catalog elements to appear
    #[arg(long, value_name = "SECS")]
    pub wait_timeout: Option<u64>,

    /// Extra milliseconds to pause after elements appear
    #[arg(long, value_name = "MS")]
    pub settle_millis: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Chrome executable to launch
    #[arg(long, value_name = "PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Save a screenshot of each failing page into this directory
    #[arg(long, value_name = "DIR")]
    pub screenshot_dir: Option<PathBuf>,

    /// Stop after the first failing check
    #[arg(long)]
    pub fail_fast: bool,
}

impl RunArgs {
    /// The flags that override file and environment settings.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            root_url: self.root_url.clone(),
            production_root_url: self.production_root_url.clone(),
            wait_timeout_secs: self.wait_timeout,
            settle_millis: self.settle_millis,
            headless: self.headed.then_some(false),
            chrome_path: self.chrome_path.clone(),
            fixtures: self.source.fixtures.clone(),
            screenshot_dir: self.screenshot_dir.clone(),
        }
    }
}

/// Arguments for the list command
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the table as TOML, ready to edit and pass to --fixtures
    #[arg(long)]
    pub toml: bool,
}

/// Arguments for the validate command
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

impl SourceArgs {
    /// Overrides carrying only the fixture path.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            fixtures: self.fixtures.clone(),
            ..Overrides::default()
        }
    }
}
