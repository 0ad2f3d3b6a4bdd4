use crate::config::{Overrides, Settings};
use crate::error::ConfigError;
use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use std::path::Path;
use tracing::debug;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "hay-check.toml";

/// Prefix of the environment variables that override file settings.
pub const ENV_PREFIX: &str = "HAY_CHECK_";

impl Settings {
    /// Load settings from every source and validate them.
    /// Priority: CLI overrides > environment variables > config file > defaults
    ///
    /// # Errors
    ///
    /// `NotFound` if `config_path` names a missing file, `Extract` if a
    /// source has the wrong shape, `InvalidValue` if validation fails.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let settings: Self = Self::figment(config_path, overrides)?
            .extract()
            .map_err(|e| ConfigError::Extract(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// The merged provider stack, before extraction.
    ///
    /// # Errors
    ///
    /// `NotFound` if `config_path` names a missing file.
    pub fn figment(
        config_path: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Figment, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) if path.exists() => Some(path.to_path_buf()),
            Some(path) => return Err(ConfigError::NotFound(path.to_path_buf())),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        if let Some(path) = config_file {
            debug!("Reading settings from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // HAY_CHECK_ROOT_URL, HAY_CHECK_WAIT_TIMEOUT_SECS, ...
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        Ok(figment.merge(Serialized::defaults(overrides)))
    }
}
