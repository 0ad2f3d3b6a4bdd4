use crate::config::Settings;
use crate::error::ConfigError;

/// Validate that a catalog root is a usable absolute URL.
pub fn validate_root_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: String::new(),
            hint: "Catalog root URL cannot be empty".to_string(),
        });
    }

    let has_scheme = url
        .split_once("://")
        .is_some_and(|(scheme, rest)| !scheme.is_empty() && !rest.is_empty());
    if !has_scheme {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: url.to_string(),
            hint: "Use an absolute URL such as https://search.library.brown.edu/catalog"
                .to_string(),
        });
    }

    if url.contains('?') {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: url.to_string(),
            hint: "The root URL cannot carry a query string; searches append their own"
                .to_string(),
        });
    }

    Ok(())
}

impl Settings {
    /// Validate settings for logical consistency.
    ///
    /// # Errors
    ///
    /// `InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_root_url("root_url", &self.root_url)?;
        validate_root_url("production_root_url", &self.production_root_url)?;

        if self.wait_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "wait_timeout_secs".to_string(),
                value: "0".to_string(),
                hint: "Use at least one second".to_string(),
            });
        }

        Ok(())
    }
}
