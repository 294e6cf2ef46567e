//! Identity provider abstraction

use crate::{AuthState, AuthUser, SessionError};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Source of truth for who is signed in.
///
/// Implementations publish every sign-in state change on the feed returned
/// by [`IdentityProvider::subscribe`].
pub trait IdentityProvider: Send + Sync + 'static {
    /// Feed of sign-in state changes, starting with the current state
    fn subscribe(&self) -> watch::Receiver<AuthState>;

    fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthUser, SessionError>> + Send;

    /// Create an account and sign it in
    fn register_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthUser, SessionError>> + Send;

    /// Set display name and avatar of the signed-in user
    fn update_profile(
        &self,
        display_name: &str,
        photo_url: &str,
    ) -> impl Future<Output = Result<AuthUser, SessionError>> + Send;

    fn sign_out(&self) -> impl Future<Output = Result<(), SessionError>> + Send;
}

impl<P: IdentityProvider> IdentityProvider for Arc<P> {
    fn subscribe(&self) -> watch::Receiver<AuthState> {
        (**self).subscribe()
    }

    fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthUser, SessionError>> + Send {
        (**self).sign_in_with_email(email, password)
    }

    fn register_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthUser, SessionError>> + Send {
        (**self).register_with_email(email, password)
    }

    fn update_profile(
        &self,
        display_name: &str,
        photo_url: &str,
    ) -> impl Future<Output = Result<AuthUser, SessionError>> + Send {
        (**self).update_profile(display_name, photo_url)
    }

    fn sign_out(&self) -> impl Future<Output = Result<(), SessionError>> + Send {
        (**self).sign_out()
    }
}
