use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::SiteConfig;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "JOBOPT_CONF";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl SiteConfig {
    /// Returns the path to the configuration file.
    ///
    /// `$JOBOPT_CONF` wins; otherwise `~/.config/jobopt/config.toml` on
    /// Unix/macOS, or the equivalent via `dirs::config_dir()`. Falls back to
    /// the current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("jobopt").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `SiteConfig::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no site config, using defaults");
            return Ok(SiteConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: SiteConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - `default_command`, when present, is not blank
    /// - `default_shell` is an absolute path
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_command.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                message: "default_command must not be empty".to_string(),
            });
        }

        if !Path::new(&self.default_shell).is_absolute() {
            return Err(ConfigError::ValidationError {
                message: format!("default_shell '{}' is not an absolute path", self.default_shell),
            });
        }

        Ok(())
    }
}
