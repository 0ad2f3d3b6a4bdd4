//! List command implementation.
//!
//! Prints to stdout so the output can be piped; `--toml` emits a table that
//! `--fixtures` accepts back.

use crate::cli::ListArgs;
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::fixtures::FixtureTable;

/// Execute the list command.
///
/// # Errors
///
/// Configuration and fixture loading errors.
pub async fn execute(args: ListArgs) -> Result<()> {
    let settings = utils::load_settings(args.source.config.as_deref(), &args.source.overrides())?;
    let table = utils::load_table(&settings)?;

    if args.toml {
        let text = table.to_toml().map_err(CliError::InvalidArgument)?;
        print!("{text}");
    } else {
        print!("{}", render(&table));
    }

    Ok(())
}

/// One block per check: name, target, expectation count, goal.
#[must_use]
pub fn render(table: &FixtureTable) -> String {
    let width = table.names().map(str::len).max().unwrap_or(0);
    let mut out = String::new();

    for spec in &table.checks {
        let count = spec.page.expectation_count();
        let noun = if count == 1 { "expectation" } else { "expectations" };
        out.push_str(&format!(
            "{:width$}  {}  ({count} {noun})\n    {}\n",
            spec.name,
            spec.page.target(),
            spec.goal,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_every_check_with_target() {
        let text = render(&FixtureTable::builtin());
        assert!(text.contains("beckwith-record   record b5706110  (1 expectation)"));
        assert!(text.contains("john-hay-search   search f[format][]=Archives/Manuscripts&q=John Hay Papers  (4 expectations)"));
        assert_eq!(text.lines().count(), 18);
    }

    #[test]
    fn render_empty_table() {
        assert_eq!(render(&FixtureTable::default()), "");
    }
}
