//! Run command implementation.

use crate::cli::RunArgs;
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::runner::{RunOptions, run_all};
use crate::ui;

/// Execute the run command.
///
/// 1. Load settings and the fixture table
/// 2. Narrow the table to `--only` names and validate it
/// 3. Run every check in its own browser
/// 4. Print the summary
///
/// # Errors
///
/// Configuration and fixture errors before any browser starts, then
/// `ChecksFailed` if any check failed or was skipped.
pub async fn execute(args: RunArgs) -> Result<()> {
    let settings = utils::load_settings(args.source.config.as_deref(), &args.overrides())?;
    let table = utils::load_table(&settings)?.select(&args.only)?;
    table.validate()?;

    ui::info(&format!(
        "Running {} checks from {} against {}",
        table.len(),
        utils::table_source(&settings),
        settings.root_url
    ));

    let options = RunOptions {
        fail_fast: args.fail_fast,
        screenshot_dir: settings.screenshot_dir.clone(),
    };
    let summary = run_all(&settings, &table, &options).await;

    ui::print_run_summary(&summary);

    if summary.skipped > 0 {
        ui::warning(&format!(
            "{} checks skipped after the first failure",
            summary.skipped
        ));
    }

    if summary.is_success() {
        ui::success(&format!("All {} checks passed", summary.total()));
        Ok(())
    } else {
        Err(CliError::ChecksFailed {
            failed: summary.failed(),
            skipped: summary.skipped,
            total: summary.total() + summary.skipped,
        })
    }
}
