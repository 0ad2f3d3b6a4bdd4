//! hay-check - acceptance checks for Archives/Manuscripts request links.
//!
//! Parses arguments, initializes logging and colors, and dispatches to the
//! command implementations.

use clap::Parser;
use hay_check::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let no_color = args.no_color || !ui::should_use_color();
    logger::init_logger(args.verbose, args.quiet, no_color);
    ui::init_colors(!no_color);

    let result = match args.command {
        cli::Command::Run(run_args) => commands::run_execute(run_args).await,
        cli::Command::List(list_args) => commands::list_execute(list_args).await,
        cli::Command::Validate(validate_args) => commands::validate_execute(validate_args).await,
    };

    // Convert CLI errors to miette diagnostics at the binary edge
    result.map_err(error::cli_error_to_miette)
}
