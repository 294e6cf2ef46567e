//! Catalog service settings and credential resolution

use serde::{Deserialize, Serialize};

/// Environment variable holding the catalog client identifier
pub const ENV_CLIENT_ID: &str = "TWITCH_CLIENT_ID";

/// Environment variable holding the catalog client secret
pub const ENV_CLIENT_SECRET: &str = "TWITCH_CLIENT_SECRET";

/// Client-credentials pair for the catalog identity endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct CatalogCredentials {
    pub client_id: String,
    pub client_secret: String,
}

// The secret must never end up in logs
impl std::fmt::Debug for CatalogCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// External catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Client identifier (overridden by `TWITCH_CLIENT_ID`)
    #[serde(default)]
    pub client_id: Option<String>,

    /// Client secret (overridden by `TWITCH_CLIENT_SECRET`)
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Client-credentials token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Catalog API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_token_url() -> String {
    "https://id.twitch.tv/oauth2/token".to_string()
}

fn default_api_url() -> String {
    "https://api.igdb.com/v4".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            token_url: default_token_url(),
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl CatalogSettings {
    /// Resolve credentials from the process environment and this file section
    pub fn credentials(&self) -> Option<CatalogCredentials> {
        self.credentials_with(|key| std::env::var(key).ok())
    }

    /// Resolve credentials using `lookup` for environment values.
    ///
    /// Each half is taken from the environment when set and non-empty,
    /// otherwise from the file. Both halves are required; a lone identifier
    /// is not enough to talk to the catalog.
    pub fn credentials_with<F>(&self, lookup: F) -> Option<CatalogCredentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |env_key: &str, file_value: &Option<String>| {
            lookup(env_key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| file_value.clone().filter(|v| !v.trim().is_empty()))
        };

        let client_id = pick(ENV_CLIENT_ID, &self.client_id)?;
        let client_secret = pick(ENV_CLIENT_SECRET, &self.client_secret)?;

        Some(CatalogCredentials {
            client_id,
            client_secret,
        })
    }
}
