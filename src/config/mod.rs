//! # Configuration
//!
//! Typed configuration for the conversion service, its database pool and
//! logging. Every field has a default, so an empty source produces a usable
//! configuration; [`ConfigLoader`] layers a file and environment overrides on
//! top and validates the result.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lead_conversion::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load()?;
//! let deadline = config.conversion.transaction_timeout();
//! let pool_size = config.database.max_connections;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::constants::defaults;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LeadConversionConfig {
    pub database: DatabaseConfig,
    pub conversion: ConversionConfig,
    pub logging: LoggingConfig,
}

impl LeadConversionConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.database.validate()?;
        self.conversion.validate()?;
        self.logging.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DATABASE_URL.to_string(),
            max_connections: defaults::MAX_CONNECTIONS,
            acquire_timeout_ms: defaults::ACQUIRE_TIMEOUT_MS,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.url.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "database.url",
                "must not be empty",
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "database.max_connections",
                "must be at least 1",
            ));
        }
        if self.acquire_timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "database.acquire_timeout_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Settings for the conversion operation itself
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Default deadline for a whole `convert` call
    pub transaction_timeout_ms: u64,
    /// Days from conversion to an opportunity's default close date
    pub opportunity_close_window_days: u32,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            transaction_timeout_ms: defaults::TRANSACTION_TIMEOUT_MS,
            opportunity_close_window_days: defaults::OPPORTUNITY_CLOSE_WINDOW_DAYS,
        }
    }
}

impl ConversionConfig {
    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_millis(self.transaction_timeout_ms)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.transaction_timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "conversion.transaction_timeout_ms",
                "must be greater than zero",
            ));
        }
        if self.opportunity_close_window_days == 0 {
            return Err(ConfigurationError::invalid_value(
                "conversion.opportunity_close_window_days",
                "must be at least one day",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.level.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "logging.level",
                "must not be empty",
            ));
        }
        Ok(())
    }
}
