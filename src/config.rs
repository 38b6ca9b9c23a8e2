//! Configuration management for the MyLar installer
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file
//! (explicit `--config` path or `<config_dir>/mylar/config.toml`), then
//! environment variables. A `.env` file in the working directory is loaded
//! into the environment by `main` before this module runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ClientConfig, CoordinatorConfig};
use crate::constants::{env, files};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Theme list and release endpoints
    pub installer: CoordinatorConfig,
    /// HTTP client settings
    pub client: ClientConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when no verbosity flag is given and `RUST_LOG` is unset
    pub level: Option<String>,
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (explicit path, else the user config file if present)
    /// 3. Environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` when an explicit file is missing, a
    /// read or format error for a bad file, and `InvalidValue` when the
    /// merged result does not validate.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Self::load_from_file(&path).await?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::load_from_file(&path).await?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// User config file location, if the platform has a config directory
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(files::CONFIG_DIR_NAME).join(files::CONFIG_FILE_NAME))
    }

    /// Override endpoints from environment variables read through `lookup`
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = non_empty(env::RELEASE_INDEX_URL) {
            debug!("{} overrides release index URL", env::RELEASE_INDEX_URL);
            self.installer.release_index_url = url;
        }

        if let Some(template) = non_empty(env::DOWNLOAD_URL_TEMPLATE) {
            debug!("{} overrides download URL template", env::DOWNLOAD_URL_TEMPLATE);
            self.installer.download_url_template = template;
        }
    }

    /// Validate every section
    pub fn validate(&self) -> ConfigResult<()> {
        self.installer.validate()?;

        if self.client.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "client.request_timeout".to_string(),
                value: "0s".to_string(),
                reason: "Request timeout cannot be zero".to_string(),
            });
        }

        if let Some(level) = &self.logging.level {
            if level.parse::<tracing::Level>().is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    reason: "Expected one of error, warn, info, debug, trace".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }
}
