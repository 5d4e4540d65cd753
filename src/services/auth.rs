//! Authentication transitions: sign-in, sign-up, sign-out, profile fetch.
//!
//! ARCHITECTURE
//! ============
//! `AuthService` sets the `SessionStore` token; it and `CatalogService`
//! clear it, the latter only when the server rejects the token with a 401.
//! Each transition calls the collaborator API first and touches the session
//! only on the outcome the transition defines. Clears are tied to the epoch
//! the call started in, so they never remove a newer session.
//!
//! TRADE-OFFS
//! ==========
//! Sign-out under `SignOutPolicy::Acknowledged` can leave the client signed
//! in when the server is unreachable. That is preferred over a client that
//! believes it signed out while the server token stays live.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use crate::config::SignOutPolicy;
use crate::net::api::CatalogApi;
use crate::net::types::{ApiError, Credentials, Registration, User};
use crate::state::session::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A sign-out call is already running.
    #[error("sign-out already in progress")]
    SignOutInProgress,
}

impl AuthError {
    /// Messages for display next to the form that triggered the call.
    #[must_use]
    pub fn display_messages(&self) -> Vec<String> {
        match self {
            Self::Api(e) => e.display_messages(),
            Self::SignOutInProgress => vec![self.to_string()],
        }
    }
}

/// What a sign-out call did to local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutOutcome {
    /// Server acknowledged; local session cleared.
    SignedOut,
    /// No token was held; nothing to do.
    AlreadySignedOut,
    /// Server call failed but the policy cleared local state anyway.
    ClearedWithoutAcknowledgement,
    /// The old token was handled, but a newer session started while the
    /// call was in flight and was left signed in.
    Superseded,
}

/// Clears the in-flight flag when the sign-out future finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct AuthService {
    api: Arc<dyn CatalogApi>,
    session: Arc<SessionStore>,
    sign_out_policy: SignOutPolicy,
    signing_out: AtomicBool,
    // One `GET /me` at a time; waiters reuse the profile it stored.
    profile_fetch: Mutex<()>,
}

impl AuthService {
    #[must_use]
    pub fn new(api: Arc<dyn CatalogApi>, session: Arc<SessionStore>, sign_out_policy: SignOutPolicy) -> Self {
        Self { api, session, sign_out_policy, signing_out: AtomicBool::new(false), profile_fetch: Mutex::new(()) }
    }

    /// Exchange credentials for a token, then fetch the profile for the new
    /// session. A profile fetch failure does not undo the sign-in.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the session is left untouched in that case.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Option<User>, AuthError> {
        let token = self.api.login(credentials).await?;
        tracing::info!(email = %credentials.email, "signed in");
        Ok(self.start_session(token).await)
    }

    /// Register an account and start a session with the returned token.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the session is left untouched in that case.
    pub async fn sign_up(&self, registration: &Registration) -> Result<Option<User>, AuthError> {
        let token = self.api.register(registration).await?;
        tracing::info!(email = %registration.email, "account registered");
        Ok(self.start_session(token).await)
    }

    async fn start_session(&self, token: String) -> Option<User> {
        self.session.set_token(Some(token));
        match self.load_profile().await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "profile fetch after sign-in failed");
                None
            }
        }
    }

    /// Fetch the profile for the current session once. Concurrent callers
    /// wait for the running fetch and return what it stored.
    ///
    /// Returns `None` without a token, the cached profile if already
    /// loaded, or the freshly fetched one. A fetch that finishes after the
    /// session changed is discarded and yields `None`. A 401 means the token
    /// is dead and the session is cleared.
    ///
    /// # Errors
    ///
    /// Returns the API failure from `GET /me`.
    pub async fn load_profile(&self) -> Result<Option<User>, AuthError> {
        let _fetching = self.profile_fetch.lock().await;
        let (snapshot, epoch) = self.session.get_with_epoch();
        let Some(token) = snapshot.token else {
            return Ok(None);
        };
        if let Some(user) = snapshot.user {
            return Ok(Some(user));
        }

        match self.api.me(&token).await {
            Ok(user) => {
                if self.session.set_user_for_epoch(epoch, user.clone()) {
                    tracing::debug!(user_id = %user.id, is_admin = user.is_admin, "profile loaded");
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            Err(e) if e.is_unauthorized() => {
                if self.session.clear_if_epoch(epoch) {
                    tracing::info!("session token rejected by server; signed out locally");
                }
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Cold start: if a token was persisted, fetch its profile before any
    /// role flag is trusted.
    ///
    /// # Errors
    ///
    /// Returns the API failure from `GET /me`.
    pub async fn restore(&self) -> Result<Option<User>, AuthError> {
        if !self.session.get().is_authenticated() {
            return Ok(None);
        }
        tracing::debug!("restoring persisted session");
        self.load_profile().await
    }

    /// Revoke the token server-side and clear local state per the
    /// configured `SignOutPolicy`.
    ///
    /// # Errors
    ///
    /// `SignOutInProgress` if another sign-out is running. Under
    /// `Acknowledged`, the API failure when the server did not confirm.
    pub async fn sign_out(&self) -> Result<SignOutOutcome, AuthError> {
        if self.signing_out.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            return Err(AuthError::SignOutInProgress);
        }
        let _in_flight = InFlight(&self.signing_out);

        let (snapshot, epoch) = self.session.get_with_epoch();
        let Some(token) = snapshot.token else {
            return Ok(SignOutOutcome::AlreadySignedOut);
        };

        match self.api.logout(&token).await {
            Ok(()) => {
                tracing::info!("signed out");
                Ok(self.finish_sign_out(epoch, SignOutOutcome::SignedOut))
            }
            // The server no longer knows the token; it is already signed out.
            Err(e) if e.is_unauthorized() => {
                tracing::info!("token already revoked; signed out locally");
                Ok(self.finish_sign_out(epoch, SignOutOutcome::SignedOut))
            }
            Err(e) => match self.sign_out_policy {
                SignOutPolicy::Optimistic => {
                    tracing::warn!(error = %e, "logout not acknowledged; clearing local session anyway");
                    Ok(self.finish_sign_out(epoch, SignOutOutcome::ClearedWithoutAcknowledgement))
                }
                SignOutPolicy::Acknowledged => {
                    tracing::warn!(error = %e, "logout not acknowledged; keeping local session");
                    Err(e.into())
                }
            },
        }
    }

    fn finish_sign_out(&self, epoch: u64, outcome: SignOutOutcome) -> SignOutOutcome {
        if self.session.clear_if_epoch(epoch) {
            return outcome;
        }
        tracing::warn!(signed_out_epoch = epoch, "a newer session started during sign-out; keeping it");
        SignOutOutcome::Superseded
    }

    /// Whether a sign-out call is currently running. Used to disable the
    /// triggering control.
    #[must_use]
    pub fn is_signing_out(&self) -> bool {
        self.signing_out.load(Ordering::Acquire)
    }
}
