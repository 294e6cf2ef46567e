//! In-process identity provider
//!
//! Accounts live in memory and passwords are kept only as SHA-256 digests.

use crate::{AuthState, AuthUser, IdentityProvider, MIN_PASSWORD_LEN, SessionError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

struct Account {
    uid: String,
    digest: String,
    display_name: Option<String>,
    photo_url: Option<String>,
}

impl Account {
    fn user(&self, email: &str) -> AuthUser {
        AuthUser {
            uid: self.uid.clone(),
            email: Some(email.to_string()),
            display_name: self.display_name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

/// Identity provider backed by an in-memory account table
pub struct LocalIdentity {
    accounts: Mutex<HashMap<String, Account>>,
    state: watch::Sender<AuthState>,
}

impl LocalIdentity {
    /// Provider with no accounts, reporting signed out
    pub fn new() -> Self {
        Self::with_state(AuthState::SignedOut)
    }

    /// Provider that reports `user` as already signed in
    pub fn signed_in(user: AuthUser) -> Self {
        Self::with_state(AuthState::SignedIn(user))
    }

    fn with_state(state: AuthState) -> Self {
        let (state, _) = watch::channel(state);
        Self {
            accounts: Mutex::new(HashMap::new()),
            state,
        }
    }

    fn accounts(&self) -> Result<MutexGuard<'_, HashMap<String, Account>>, SessionError> {
        self.accounts
            .lock()
            .map_err(|_| SessionError::Provider("account table lock poisoned".to_string()))
    }

    fn publish(&self, state: AuthState) {
        self.state.send_replace(state);
    }
}

impl Default for LocalIdentity {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercased, trimmed address with a local part and a dotted domain
fn normalize_email(email: &str) -> Result<String, SessionError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && domain.contains('.') && !domain.contains('@') =>
        {
            Ok(email)
        }
        _ => Err(SessionError::InvalidEmail(email)),
    }
}

fn sha256_hex(parts: &[&str]) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(b":");
        }
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Stable 28 character uid derived from the address
fn uid_for(email: &str) -> String {
    let mut uid = sha256_hex(&[email]);
    uid.truncate(28);
    uid
}

fn password_digest(email: &str, password: &str) -> String {
    sha256_hex(&[email, password])
}

impl IdentityProvider for LocalIdentity {
    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    async fn sign_in_with_email(&self, email: &str, password: &str) -> Result<AuthUser, SessionError> {
        let email = normalize_email(email)?;

        let user = {
            let accounts = self.accounts()?;
            let account = accounts
                .get(&email)
                .ok_or(SessionError::InvalidCredentials)?;
            if account.digest != password_digest(&email, password) {
                return Err(SessionError::InvalidCredentials);
            }
            account.user(&email)
        };

        tracing::info!("Signed in {}", user.uid);
        self.publish(AuthState::SignedIn(user.clone()));
        Ok(user)
    }

    async fn register_with_email(&self, email: &str, password: &str) -> Result<AuthUser, SessionError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SessionError::WeakPassword);
        }

        let user = {
            let mut accounts = self.accounts()?;
            if accounts.contains_key(&email) {
                return Err(SessionError::EmailInUse(email));
            }
            let account = Account {
                uid: uid_for(&email),
                digest: password_digest(&email, password),
                display_name: None,
                photo_url: None,
            };
            let user = account.user(&email);
            accounts.insert(email, account);
            user
        };

        tracing::info!("Registered {}", user.uid);
        self.publish(AuthState::SignedIn(user.clone()));
        Ok(user)
    }

    async fn update_profile(&self, display_name: &str, photo_url: &str) -> Result<AuthUser, SessionError> {
        let mut user = match &*self.state.borrow() {
            AuthState::SignedIn(user) => user.clone(),
            _ => return Err(SessionError::NotSignedIn),
        };
        user.display_name = Some(display_name.to_string());
        user.photo_url = Some(photo_url.to_string());

        if let Some(email) = &user.email
            && let Some(account) = self.accounts()?.get_mut(email)
        {
            account.display_name = user.display_name.clone();
            account.photo_url = user.photo_url.clone();
        }

        self.publish(AuthState::SignedIn(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        self.publish(AuthState::SignedOut);
        Ok(())
    }
}
