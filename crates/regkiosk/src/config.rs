//! Configuration management for regkiosk.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pad::DEFAULT_STROKE_WIDTH;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "regkiosk";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "kiosk.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `REGKIOSK_`)
/// 2. TOML config file at `~/.config/regkiosk/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Signature pad configuration.
    pub pad: PadConfig,
    /// Kiosk behavior configuration.
    pub kiosk: KioskConfig,
}

/// Which gateway backs the record collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Local single-document store.
    #[default]
    Local,
    /// Hosted row-oriented table.
    Remote,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Gateway backend to use.
    pub backend: Backend,
    /// Path to the local database file.
    /// Defaults to `~/.local/share/regkiosk/kiosk.db`
    pub database_path: Option<PathBuf>,
    /// Remote table settings, used when `backend` is `remote`.
    pub remote: RemoteConfig,
}

/// Remote table configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the hosted table service.
    pub base_url: String,
    /// Access token sent with every request.
    pub api_key: String,
    /// Table name holding the registrants.
    pub table: String,
}

/// Signature pad configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    /// Drawing surface width in pixels.
    pub width: u32,
    /// Drawing surface height in pixels.
    pub height: u32,
    /// Brush width in pixels.
    pub stroke_width: u32,
}

/// Kiosk behavior configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Whether the department qualifies the registration key.
    pub key_includes_department: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            table: "registrants".to_string(),
        }
    }
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 200,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("REGKIOSK_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.pad.width == 0 || self.pad.height == 0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "pad dimensions must be greater than 0 (got {}x{})",
                    self.pad.width, self.pad.height
                ),
            });
        }

        if self.pad.stroke_width == 0 {
            return Err(Error::ConfigValidation {
                message: "pad stroke_width must be greater than 0".to_string(),
            });
        }

        if self.storage.backend == Backend::Remote {
            if self.storage.remote.base_url.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "remote backend requires storage.remote.base_url".to_string(),
                });
            }
            if self.storage.remote.api_key.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "remote backend requires storage.remote.api_key".to_string(),
                });
            }
            if self.storage.remote.table.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "remote backend requires storage.remote.table".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the local database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.backend, Backend::Local);
        assert!(config.storage.database_path.is_none());
        assert!(!config.kiosk.key_includes_department);
    }

    #[test]
    fn test_default_pad_config() {
        let pad = PadConfig::default();
        assert_eq!(pad.width, 600);
        assert_eq!(pad.height, 200);
        assert_eq!(pad.stroke_width, DEFAULT_STROKE_WIDTH);
    }

    #[test]
    fn test_default_remote_config() {
        let remote = RemoteConfig::default();
        assert!(remote.base_url.is_empty());
        assert!(remote.api_key.is_empty());
        assert_eq!(remote.table, "registrants");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_pad_dimensions() {
        let mut config = Config::default();
        config.pad.width = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("pad dimensions"));
    }

    #[test]
    fn test_validate_zero_stroke_width() {
        let mut config = Config::default();
        config.pad.stroke_width = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("stroke_width"));
    }

    #[test]
    fn test_validate_remote_requires_base_url() {
        let mut config = Config::default();
        config.storage.backend = Backend::Remote;
        config.storage.remote.api_key = "token".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("base_url"));
    }

    #[test]
    fn test_validate_remote_requires_api_key() {
        let mut config = Config::default();
        config.storage.backend = Backend::Remote;
        config.storage.remote.base_url = "https://kiosk.example.com".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("api_key"));
    }

    #[test]
    fn test_validate_remote_complete() {
        let mut config = Config::default();
        config.storage.backend = Backend::Remote;
        config.storage.remote.base_url = "https://kiosk.example.com".to_string();
        config.storage.remote.api_key = "token".to_string();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config
            .database_path()
            .to_string_lossy()
            .contains("kiosk.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));
        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("regkiosk"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), Config::default());
    }

    #[test]
    fn test_backend_serde() {
        assert_eq!(serde_json::to_string(&Backend::Local).unwrap(), "\"local\"");
        let backend: Backend = serde_json::from_str("\"remote\"").unwrap();
        assert_eq!(backend, Backend::Remote);
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
