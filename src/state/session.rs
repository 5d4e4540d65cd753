//! Session store: the current token and user profile.
//!
//! DESIGN
//! ======
//! The store is the single source of truth for "is the visitor
//! authenticated". It is shared as an explicit context object
//! (`Arc<SessionStore>`) rather than a global. Only the token is
//! persisted; the profile is always re-fetched.
//!
//! Every `set_token` advances an epoch. Profile fetches remember the epoch
//! they started in and are dropped if it moved on, so a fetch resolving
//! after sign-out cannot repopulate the profile.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use super::storage::{KeyValueStorage, TOKEN_KEY};
use crate::net::types::User;

/// Snapshot of the client-held session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    /// A missing token means unauthenticated, whatever `user` holds.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn is_profile_loaded(&self) -> bool {
        self.is_authenticated() && self.user.is_some()
    }

    /// Admin flag, fail-closed: false until the profile is loaded.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.user.as_ref().is_some_and(|u| u.is_admin)
    }
}

#[derive(Debug, Default)]
struct Inner {
    session: Session,
    epoch: u64,
}

pub struct SessionStore {
    inner: RwLock<Inner>,
    storage: Arc<dyn KeyValueStorage>,
    // Orders disk writes the same as in-memory transitions. Held across the
    // storage call; the `inner` lock is not.
    persist_lock: Mutex<()>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("inner", &self.inner).finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Empty session backed by `storage`. Does not read the persisted token.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { inner: RwLock::new(Inner::default()), storage, persist_lock: Mutex::new(()) }
    }

    /// Cold-start constructor: picks up a previously persisted token. The
    /// profile starts empty and must be fetched before any role check.
    #[must_use]
    pub fn restore(storage: Arc<dyn KeyValueStorage>) -> Self {
        let token = match storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted session token");
                None
            }
        };
        tracing::debug!(restored = token.is_some(), "session restored");
        let inner = Inner { session: Session { token, user: None }, epoch: 0 };
        Self { inner: RwLock::new(inner), storage, persist_lock: Mutex::new(()) }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn persisting(&self) -> MutexGuard<'_, ()> {
        self.persist_lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Current `{ token, user }` snapshot.
    #[must_use]
    pub fn get(&self) -> Session {
        self.read().session.clone()
    }

    /// Snapshot together with the epoch it belongs to, read atomically.
    #[must_use]
    pub fn get_with_epoch(&self) -> (Session, u64) {
        let inner = self.read();
        (inner.session.clone(), inner.epoch)
    }

    /// Current epoch; advanced by every `set_token`.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.read().epoch
    }

    /// Set or clear the token.
    ///
    /// `Some` stores and persists it. `None` clears the token and removes
    /// the persisted key. Either way the profile is reset and must be
    /// fetched again for the new epoch. Readers see the new token before
    /// the storage write; a storage failure is only logged.
    pub fn set_token(&self, token: Option<String>) {
        let _persisting = self.persisting();
        Self::swap_token(&mut self.write(), token.clone());
        self.persist(token.as_deref());
    }

    fn swap_token(inner: &mut Inner, token: Option<String>) {
        // A new epoch never inherits the previous profile.
        inner.epoch += 1;
        inner.session.user = None;
        tracing::debug!(authenticated = token.is_some(), epoch = inner.epoch, "session token changed");
        inner.session.token = token;
    }

    /// Blocking file I/O on the caller's thread. The token file is a few
    /// bytes and no session lock is held, so guard checks never wait on it.
    fn persist(&self, token: Option<&str>) {
        let persisted = match token {
            Some(value) => self.storage.set(TOKEN_KEY, value),
            None => self.storage.remove(TOKEN_KEY),
        };
        if let Err(e) = persisted {
            tracing::warn!(error = %e, "session token persistence failed");
        }
    }

    /// Replace the profile (`None` resets it).
    pub fn set_user(&self, user: Option<User>) {
        self.write().session.user = user;
    }

    /// Apply a fetched profile only if no `set_token` happened since the
    /// fetch started and a token is still present. Returns whether it was
    /// applied.
    pub fn set_user_for_epoch(&self, epoch: u64, user: User) -> bool {
        let mut inner = self.write();
        if inner.epoch != epoch || inner.session.token.is_none() {
            tracing::debug!(fetched_epoch = epoch, current_epoch = inner.epoch, "discarding stale profile");
            return false;
        }
        inner.session.user = Some(user);
        true
    }

    /// Clear the session only if it is still the one from `epoch`.
    pub fn clear_if_epoch(&self, epoch: u64) -> bool {
        let _persisting = self.persisting();
        {
            let mut inner = self.write();
            if inner.epoch != epoch {
                return false;
            }
            Self::swap_token(&mut inner, None);
        }
        self.persist(None);
        true
    }
}
