//! Configuration Loader
//!
//! Layers, lowest precedence first: built-in defaults, an optional file
//! (YAML, TOML or JSON, chosen by extension), then `LEAD_CONVERSION__*`
//! environment variables using `__` as the section separator, e.g.
//! `LEAD_CONVERSION__CONVERSION__TRANSACTION_TIMEOUT_MS=5000`.
//! `DATABASE_URL`, when set, wins over every other source for the database URL.

use super::error::{ConfigResult, ConfigurationError};
use super::LeadConversionConfig;
use crate::constants::{CONFIG_ENV_PREFIX, CONFIG_PATH_ENV};
use config::{Config, Environment, File};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load using the file named by `LEAD_CONVERSION_CONFIG`, if any
    pub fn load() -> ConfigResult<LeadConversionConfig> {
        let path = env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from_path(path.as_deref())
    }

    pub fn load_from_path(path: Option<&Path>) -> ConfigResult<LeadConversionConfig> {
        let mut config = Self::build(path, None)?;
        if let Ok(url) = env::var("DATABASE_URL") {
            config.database.url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load with an explicit variable set instead of the process environment.
    /// Useful for tests that must not mutate global state.
    pub fn load_with_env(
        path: Option<&Path>,
        vars: HashMap<String, String>,
    ) -> ConfigResult<LeadConversionConfig> {
        let database_url = vars.get("DATABASE_URL").cloned();
        let mut config = Self::build(path, Some(vars))?;
        if let Some(url) = database_url {
            config.database.url = url;
        }
        config.validate()?;
        Ok(config)
    }

    fn build(
        path: Option<&Path>,
        vars: Option<HashMap<String, String>>,
    ) -> ConfigResult<LeadConversionConfig> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigurationError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        let environment = Environment::with_prefix(CONFIG_ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(vars);
        builder = builder.add_source(environment);

        let config = builder.build()?.try_deserialize::<LeadConversionConfig>()?;
        Ok(config)
    }
}
