//! Shared loading steps for command implementations.

use crate::config::{Overrides, Settings};
use crate::error::Result;
use crate::fixtures::FixtureTable;
use std::path::Path;
use tracing::debug;

/// Load settings from every source.
pub fn load_settings(config: Option<&Path>, overrides: &Overrides) -> Result<Settings> {
    let settings = Settings::load(config, overrides)?;
    debug!(?settings, "Loaded settings");
    Ok(settings)
}

/// The fixture table the settings point at, or the built-in one.
pub fn load_table(settings: &Settings) -> Result<FixtureTable> {
    match &settings.fixtures {
        Some(path) => {
            debug!("Loading fixtures from {}", path.display());
            Ok(FixtureTable::load(path)?)
        }
        None => Ok(FixtureTable::builtin()),
    }
}

/// Where the table came from, for status lines.
pub fn table_source(settings: &Settings) -> String {
    settings.fixtures.as_ref().map_or_else(
        || "built-in table".to_string(),
        |path| path.display().to_string(),
    )
}
