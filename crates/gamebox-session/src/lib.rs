//! Session state for Gamebox
//!
//! Tracks who is signed in, as reported by an [`IdentityProvider`], and
//! exposes it through a narrow read-only [`SessionSnapshot`].

mod local;
mod provider;
mod session;

pub use local::LocalIdentity;
pub use provider::IdentityProvider;
pub use session::{Session, SessionSnapshot};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Password must be at least 6 characters")]
    WeakPassword,

    #[error("An account already exists for {0}")]
    EmailInUse(String),

    #[error("Wrong email or password")]
    InvalidCredentials,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Shortest password an identity provider accepts
pub const MIN_PASSWORD_LEN: usize = 6;

/// A signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl AuthUser {
    /// Name to greet the user with
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

/// What the identity provider currently knows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// No report yet
    #[default]
    Unknown,
    SignedOut,
    SignedIn(AuthUser),
}

/// Generated avatar for a newly registered user
pub fn avatar_url(seed: &str) -> String {
    let mut encoded = String::with_capacity(seed.len());
    for byte in seed.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    format!("https://api.dicebear.com/9.x/micah/svg?seed={}", encoded)
}
