use super::*;

use uuid::Uuid;

use crate::net::types::{User, UserId};

fn user(is_admin: bool) -> User {
    User { id: UserId::Int(7), name: "Ada".into(), email: "ada@example.com".into(), is_admin }
}

fn session(token: Option<&str>, user: Option<User>) -> Session {
    Session { token: token.map(str::to_owned), user }
}

/// Every combination of token presence and profile state.
fn all_sessions() -> Vec<Session> {
    let mut out = Vec::new();
    for token in [None, Some("abc")] {
        for profile in [None, Some(user(false)), Some(user(true))] {
            out.push(session(token, profile));
        }
    }
    out
}

// =============================================================================
// GuardKind
// =============================================================================

#[test]
fn guest_only_redirects_iff_token_present() {
    for s in all_sessions() {
        let redirect = GuardKind::GuestOnly.check(&s);
        assert_eq!(redirect.is_some(), s.token.is_some(), "{s:?}");
        if let Some(target) = redirect {
            assert_eq!(target, Route::Home);
        }
    }
}

#[test]
fn authenticated_only_redirects_iff_token_absent() {
    for s in all_sessions() {
        let redirect = GuardKind::AuthenticatedOnly.check(&s);
        assert_eq!(redirect.is_some(), s.token.is_none(), "{s:?}");
        if let Some(target) = redirect {
            assert_eq!(target, Route::SignIn);
        }
    }
}

// =============================================================================
// admin affordance
// =============================================================================

#[test]
fn admin_affordance_shown_only_for_loaded_admin() {
    for s in all_sessions() {
        let expected = s.token.is_some() && s.user.as_ref().is_some_and(|u| u.is_admin);
        assert_eq!(admin_affordance_visible(&s), expected, "{s:?}");
    }
}

#[test]
fn admin_affordance_hidden_before_profile_loads() {
    assert!(!admin_affordance_visible(&session(Some("abc"), None)));
}

// =============================================================================
// resolve
// =============================================================================

#[test]
fn fresh_session_is_sent_to_sign_in() {
    assert_eq!(resolve(Route::Home, &Session::default()), Navigation::Redirect(Route::SignIn));
    assert_eq!(resolve(Route::Products, &Session::default()), Navigation::Redirect(Route::SignIn));
}

#[test]
fn authenticated_visitor_is_sent_away_from_sign_in() {
    let s = session(Some("abc"), None);
    assert_eq!(resolve(Route::SignIn, &s), Navigation::Redirect(Route::Home));
    assert_eq!(resolve(Route::SignUp, &s), Navigation::Redirect(Route::Home));
}

#[test]
fn not_found_renders_for_everyone() {
    for s in all_sessions() {
        assert_eq!(resolve(Route::NotFound, &s), Navigation::Render(Route::NotFound));
    }
}

#[test]
fn category_edit_waits_for_profile() {
    let id = Uuid::nil();
    assert_eq!(resolve(Route::EditCategory(id), &session(Some("abc"), None)), Navigation::Pending);
}

#[test]
fn category_edit_denied_for_non_admin() {
    let id = Uuid::nil();
    let s = session(Some("abc"), Some(user(false)));
    assert_eq!(resolve(Route::EditCategory(id), &s), Navigation::Redirect(Route::Categories));
}

#[test]
fn category_edit_renders_for_admin() {
    let id = Uuid::nil();
    let s = session(Some("abc"), Some(user(true)));
    assert_eq!(resolve(Route::EditCategory(id), &s), Navigation::Render(Route::EditCategory(id)));
}

#[test]
fn category_edit_without_token_goes_to_sign_in_first() {
    let id = Uuid::nil();
    let s = session(None, Some(user(true)));
    assert_eq!(resolve(Route::EditCategory(id), &s), Navigation::Redirect(Route::SignIn));
}
