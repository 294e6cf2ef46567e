//! Search, library and session settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Interactive search tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before a search fires
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Queries shorter than this never reach the catalog
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

fn default_debounce() -> u64 {
    500
}

fn default_min_query_len() -> usize {
    2
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
            min_query_len: default_min_query_len(),
        }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Durable library storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrarySettings {
    /// SQLite database holding every user's entries
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

fn default_database_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(crate::USER_CONFIG_DIR)
        .join("library.db")
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// Session / identity settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// How long to wait for the identity provider before rendering anyway
    #[serde(default = "default_auth_timeout")]
    pub auth_timeout_ms: u64,

    /// Profile used when no user is given on the command line
    #[serde(default)]
    pub default_user: Option<String>,
}

fn default_auth_timeout() -> u64 {
    2000
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            auth_timeout_ms: default_auth_timeout(),
            default_user: None,
        }
    }
}

impl SessionSettings {
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_millis(self.auth_timeout_ms)
    }
}
