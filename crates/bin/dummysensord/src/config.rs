//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `dummysensor.toml` in the working directory, or the file named by
//! `DUMMYSENSOR_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Deserialize;

use dummysensor_domain::accessory::AccessoryConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Durable state settings.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Accessories exposed to the host.
    pub accessories: Vec<AccessoryConfig>,
}

/// Durable state store configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the persisted switch and sensor values.
    pub path: PathBuf,
    /// Treat corrupted records as absent instead of failing.
    pub forgive_parse_errors: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// accessory list is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("DUMMYSENSOR_CONFIG").unwrap_or_else(|_| "dummysensor.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DUMMYSENSOR_PERSIST_PATH") {
            self.storage.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("DUMMYSENSOR_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for accessory in &self.accessories {
            if accessory.validate().is_err() {
                return Err(ConfigError::Validation(
                    "accessory name must not be empty".to_string(),
                ));
            }
            if !seen.insert(accessory.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "accessory {:?} is configured twice",
                    accessory.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("persist"),
            forgive_parse_errors: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "dummysensord=info,dummysensor=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
