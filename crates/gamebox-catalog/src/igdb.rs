//! IGDB-compatible catalog source
//!
//! Authenticates with a client-credentials exchange against the identity
//! endpoint and posts query-language bodies to `{api_url}/games`.

use crate::{CatalogError, CatalogRequest, CatalogSource, RawGame};
use gamebox_config::{CatalogCredentials, CatalogSettings};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Tokens are refreshed this long before the server says they expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Catalog source backed by the IGDB HTTP API
pub struct IgdbSource {
    credentials: Option<CatalogCredentials>,
    token_url: String,
    api_url: String,
    client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl IgdbSource {
    /// Create a source using the configured credential policy
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        Self::with_credentials(settings, settings.credentials())
    }

    /// Create a source with explicitly resolved credentials.
    ///
    /// Missing credentials are not an error here; every fetch will fail
    /// with [`CatalogError::MissingCredentials`] instead.
    pub fn with_credentials(
        settings: &CatalogSettings,
        credentials: Option<CatalogCredentials>,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(format!("Gamebox/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        if credentials.is_none() {
            tracing::warn!("Catalog credentials missing; searches will return no results");
        }

        Ok(Self {
            credentials,
            token_url: settings.token_url.clone(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            client,
            token: Mutex::new(None),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Return a cached bearer token or exchange credentials for a new one
    async fn access_token(&self, credentials: &CatalogCredentials) -> Result<String, CatalogError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref()
            && token.is_fresh()
        {
            return Ok(token.access_token.clone());
        }

        let token = self.exchange_token(credentials).await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn exchange_token(
        &self,
        credentials: &CatalogCredentials,
    ) -> Result<CachedToken, CatalogError> {
        tracing::debug!("Exchanging client credentials at {}", self.token_url);

        let response = self
            .client
            .post(&self.token_url)
            .query(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::TokenExchange(format!(
                "Identity endpoint returned {}",
                response.status()
            )));
        }

        let text = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&text)?;

        if token.access_token.is_empty() {
            return Err(CatalogError::TokenExchange(
                "Identity endpoint returned an empty token".to_string(),
            ));
        }

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }
}

impl CatalogSource for IgdbSource {
    async fn fetch(&self, request: &CatalogRequest) -> Result<Vec<RawGame>, CatalogError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(CatalogError::MissingCredentials)?;

        let token = self.access_token(credentials).await?;
        let url = format!("{}/games", self.api_url);

        tracing::debug!("Querying catalog at {} (limit {})", url, request.limit);

        let response = self
            .client
            .post(&url)
            .header("Client-ID", &credentials.client_id)
            .bearer_auth(token)
            .body(request.body.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                // Revoked or expired early; next call exchanges again
                self.invalidate_token().await;
            }
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let games: Vec<RawGame> = serde_json::from_str(&text)?;

        tracing::debug!("Catalog returned {} records", games.len());
        Ok(games)
    }
}
