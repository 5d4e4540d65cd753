//! Application context: the shared session plus the services that act on it.
//!
//! DESIGN
//! ======
//! `App` is passed by reference to the navigation layer and to every view
//! that needs auth state. Nothing here is global; tests build as many
//! independent `App`s as they like.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::api::{CatalogApi, HttpCatalogApi};
use crate::net::types::ApiError;
use crate::routes::Route;
use crate::routes::guard::{self, Navigation};
use crate::services::auth::AuthService;
use crate::services::catalog::CatalogService;
use crate::state::session::{Session, SessionStore};
use crate::state::storage::{FileStorage, KeyValueStorage};

pub struct App {
    session: Arc<SessionStore>,
    pub auth: AuthService,
    pub catalog: CatalogService,
}

impl App {
    /// Wire the app from config: HTTP client, file-backed token storage and
    /// a session restored from it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let api: Arc<dyn CatalogApi> = Arc::new(HttpCatalogApi::new(config)?);
        let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::new(config.session_file.clone()));
        Ok(Self::new(api, storage, config))
    }

    #[must_use]
    pub fn new(api: Arc<dyn CatalogApi>, storage: Arc<dyn KeyValueStorage>, config: &ClientConfig) -> Self {
        let session = Arc::new(SessionStore::restore(storage));
        let auth = AuthService::new(api.clone(), session.clone(), config.sign_out_policy);
        let catalog = CatalogService::new(api, session.clone());
        Self { session, auth, catalog }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.session.get()
    }

    /// Resolve `path` and run it through the route guards.
    #[must_use]
    pub fn navigate(&self, path: &str) -> Navigation {
        self.navigate_to(Route::parse(path))
    }

    #[must_use]
    pub fn navigate_to(&self, route: Route) -> Navigation {
        guard::resolve(route, &self.session.get())
    }

    /// Like `navigate_to`, but a `Pending` outcome first loads the profile
    /// and then resolves again. A failed fetch stays fail-closed.
    pub async fn navigate_loaded(&self, route: Route) -> Navigation {
        match self.navigate_to(route) {
            Navigation::Pending => {
                if let Err(e) = self.auth.load_profile().await {
                    tracing::warn!(error = %e, %route, "profile fetch for navigation failed");
                }
                match self.navigate_to(route) {
                    // Still unknown after a fetch: treat as not authorized.
                    Navigation::Pending => Navigation::Redirect(Route::Categories),
                    other => other,
                }
            }
            other => other,
        }
    }

    /// Whether admin-only controls should be offered right now.
    #[must_use]
    pub fn show_admin_controls(&self) -> bool {
        guard::admin_affordance_visible(&self.session.get())
    }
}
