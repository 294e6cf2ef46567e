//! Process-wide session state

use crate::{AuthState, AuthUser, IdentityProvider, SessionError, avatar_url};
use gamebox_config::SessionSettings;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Read-only view of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<AuthUser>,
    /// True until the provider first reports or the safety timer fires
    pub loading: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

/// Sign-in state fed by an [`IdentityProvider`].
///
/// Dropping the session (or calling [`Session::shutdown`]) stops the
/// provider listener and the safety timer.
pub struct Session<P> {
    provider: P,
    state: Arc<watch::Sender<SessionSnapshot>>,
    listener: JoinHandle<()>,
    timer: JoinHandle<()>,
}

impl<P: IdentityProvider> Session<P> {
    /// Subscribe to `provider` and start the safety timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn init(provider: P, settings: &SessionSettings) -> Self {
        let (tx, _) = watch::channel(SessionSnapshot::default());
        let state = Arc::new(tx);

        let mut feed = provider.subscribe();
        let listener_state = Arc::clone(&state);
        let listener = tokio::spawn(async move {
            loop {
                let current = feed.borrow_and_update().clone();
                match current {
                    AuthState::Unknown => {}
                    AuthState::SignedOut => listener_state.send_modify(|s| {
                        s.user = None;
                        s.loading = false;
                    }),
                    AuthState::SignedIn(user) => {
                        tracing::debug!("Provider reports {} signed in", user.uid);
                        listener_state.send_modify(|s| {
                            s.user = Some(user);
                            s.loading = false;
                        });
                    }
                }

                if feed.changed().await.is_err() {
                    tracing::debug!("Identity feed closed");
                    break;
                }
            }
        });

        let timeout = settings.auth_timeout();
        let timer_state = Arc::clone(&state);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            timer_state.send_if_modified(|s| {
                if !s.loading {
                    return false;
                }
                tracing::warn!(
                    "Auth check timed out after {}ms, continuing without a user",
                    timeout.as_millis()
                );
                s.loading = false;
                true
            });
        });

        Self {
            provider,
            state,
            listener,
            timer,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Feed of snapshot changes
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Wait until the first provider report or the safety timeout
    pub async fn ready(&self) -> SessionSnapshot {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|s| !s.loading).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn login_with_email(&self, email: &str, password: &str) -> Result<AuthUser, SessionError> {
        let user = self
            .provider
            .sign_in_with_email(email, password)
            .await
            .inspect_err(|e| tracing::warn!("Sign-in failed: {}", e))?;

        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Create an account, then give it `display_name` and a generated avatar
    pub async fn register_with_email(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthUser, SessionError> {
        self.provider
            .register_with_email(email, password)
            .await
            .inspect_err(|e| tracing::warn!("Registration failed: {}", e))?;

        let user = self
            .provider
            .update_profile(display_name, &avatar_url(display_name))
            .await?;

        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Sign out. Errors are logged; `loading` is always cleared afterwards.
    pub async fn logout(&self) {
        self.state.send_modify(|s| s.loading = true);

        match self.provider.sign_out().await {
            Ok(()) => self.set_user(None),
            Err(e) => tracing::error!("Logout error: {}", e),
        }

        self.state.send_modify(|s| s.loading = false);
    }

    /// Stop listening to the provider
    pub fn shutdown(self) {
        tracing::debug!("Session shut down");
    }

    fn set_user(&self, user: Option<AuthUser>) {
        self.state.send_modify(|s| {
            s.user = user;
            s.loading = false;
        });
    }
}

impl<P> Drop for Session<P> {
    fn drop(&mut self) {
        self.listener.abort();
        self.timer.abort();
    }
}
