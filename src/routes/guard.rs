//! Route guards and the admin affordance policy.
//!
//! DESIGN
//! ======
//! Guards are pure functions of a `Session` snapshot and never mutate it.
//! The admin checks here are advisory: they decide what the client offers,
//! while the server re-authorizes every mutating request on its own.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::Route;
use crate::state::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardKind {
    /// Entry only without a token (sign-in, sign-up).
    GuestOnly,
    /// Entry only with a token (everything else).
    AuthenticatedOnly,
}

impl GuardKind {
    /// Redirect target if the guard rejects the session, `None` to pass.
    #[must_use]
    pub fn check(self, session: &Session) -> Option<Route> {
        match (self, session.is_authenticated()) {
            (Self::GuestOnly, true) => Some(Route::LANDING),
            (Self::AuthenticatedOnly, false) => Some(Route::SignIn),
            _ => None,
        }
    }
}

/// Result of navigating to a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
    /// The view needs the profile before it can decide; render nothing yet.
    Pending,
}

/// Whether admin-only controls (e.g. "edit category") are shown. Hidden
/// until the profile is loaded and its flag is strictly true.
#[must_use]
pub fn admin_affordance_visible(session: &Session) -> bool {
    session.is_admin()
}

/// Apply the route's guard, then its admin view policy.
#[must_use]
pub fn resolve(route: Route, session: &Session) -> Navigation {
    if let Some(target) = route.guard().and_then(|g| g.check(session)) {
        tracing::debug!(from = %route, to = %target, "navigation redirected");
        return Navigation::Redirect(target);
    }
    if route.requires_admin() {
        if !session.is_profile_loaded() {
            return Navigation::Pending;
        }
        if !session.is_admin() {
            tracing::debug!(from = %route, "admin view denied");
            return Navigation::Redirect(Route::Categories);
        }
    }
    Navigation::Render(route)
}
