//! Miette report conversion for CLI errors.

use crate::error::{CliError, checks_failed_line};
use miette::Report;

/// Convert `CliError` to a miette `Report`.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::ChecksFailed {
            failed,
            skipped,
            total,
        } => miette::miette!(
            "{}\n\nHint: Each failure is logged above; rerun one with --only <NAME> --verbose",
            checks_failed_line(&failed, &skipped, &total)
        ),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        CliError::Fixture(e) => miette::miette!("Fixture error: {}", e),
        _ => miette::miette!("{}", err),
    }
}
