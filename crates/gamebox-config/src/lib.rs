//! Configuration management for Gamebox
//!
//! Handles catalog credentials, search tuning, library storage location and
//! session timing. Configuration lives in TOML files; every section falls
//! back to sensible defaults so a missing file is never fatal.

mod catalog;
mod settings;

pub use catalog::{CatalogCredentials, CatalogSettings, ENV_CLIENT_ID, ENV_CLIENT_SECRET};
pub use settings::{LibrarySettings, SearchSettings, SessionSettings};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// System-wide configuration directory
pub const CONFIG_DIR: &str = "/etc/gamebox";

/// Per-user configuration directory, relative to `$HOME`
pub const USER_CONFIG_DIR: &str = ".gamebox";

/// Configuration file name inside either directory
pub const CONFIG_FILE: &str = "config.toml";

/// Main Gamebox configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameboxConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub library: LibrarySettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl GameboxConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        // User config wins over system config
        if let Some(user_config) = user_config_path()
            && user_config.exists()
        {
            return Self::load(&user_config);
        }

        let system_config = Path::new(CONFIG_DIR).join(CONFIG_FILE);
        if system_config.exists() {
            return Self::load(&system_config);
        }

        tracing::warn!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.min_query_len == 0 {
            return Err(ConfigError::Invalid(
                "search.min_query_len must be at least 1".to_string(),
            ));
        }

        if self.catalog.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "catalog.timeout_secs must be positive".to_string(),
            ));
        }

        if self.library.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "library.database_path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Path of the per-user configuration file, if `$HOME` is known
pub fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(USER_CONFIG_DIR)
            .join(CONFIG_FILE)
    })
}
