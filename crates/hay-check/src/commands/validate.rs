//! Validate command implementation.
//!
//! Checks settings and the fixture table without launching a browser.

use crate::cli::ValidateArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Execute the validate command.
///
/// # Errors
///
/// Configuration errors, fixture loading errors, or `Invalid` listing every
/// broken rule in the table.
pub async fn execute(args: ValidateArgs) -> Result<()> {
    ui::info("Checking settings...");
    let settings = utils::load_settings(args.source.config.as_deref(), &args.source.overrides())?;
    ui::success(&format!("Settings are valid (root: {})", settings.root_url));

    ui::info(&format!("Checking {}...", utils::table_source(&settings)));
    let table = utils::load_table(&settings)?;
    table.validate()?;

    let expectations: usize = table
        .checks
        .iter()
        .map(|c| c.page.expectation_count())
        .sum();
    ui::success(&format!(
        "Fixture table is valid: {} checks, {expectations} expectations",
        table.len()
    ));

    Ok(())
}
