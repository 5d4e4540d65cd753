//! Category and product operations on behalf of the current session.
//!
//! Reads are public on the API and send the token only when one is held.
//! Writes need a token. A 401 on any call means the token is dead, so the
//! session it belonged to is cleared; a 403 leaves the session alone.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::sync::Arc;

use uuid::Uuid;

use crate::net::api::CatalogApi;
use crate::net::types::{ApiError, Category, CategoryInput, Product, ProductInput};
use crate::state::session::SessionStore;

pub struct CatalogService {
    api: Arc<dyn CatalogApi>,
    session: Arc<SessionStore>,
}

impl CatalogService {
    #[must_use]
    pub fn new(api: Arc<dyn CatalogApi>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    fn credential(&self) -> Result<(String, u64), ApiError> {
        let (session, epoch) = self.session.get_with_epoch();
        session
            .token
            .map(|token| (token, epoch))
            .ok_or_else(|| ApiError::Authentication(vec!["You are not signed in.".to_owned()]))
    }

    fn observe<T>(&self, epoch: u64, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            if e.is_unauthorized() && self.session.clear_if_epoch(epoch) {
                tracing::info!("session token rejected by server; signed out locally");
            }
        }
        result
    }

    // =========================================================================
    // CATEGORIES
    // =========================================================================

    /// # Errors
    ///
    /// Returns the API failure.
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let (session, epoch) = self.session.get_with_epoch();
        let result = self.api.list_categories(session.token.as_deref()).await;
        self.observe(epoch, result)
    }

    /// # Errors
    ///
    /// Returns the API failure.
    pub async fn get_category(&self, id: Uuid) -> Result<Category, ApiError> {
        let (session, epoch) = self.session.get_with_epoch();
        let result = self.api.get_category(session.token.as_deref(), id).await;
        self.observe(epoch, result)
    }

    /// # Errors
    ///
    /// Returns the API failure, or `Authentication` without a token.
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        let (token, epoch) = self.credential()?;
        let result = self.api.create_category(&token, input).await;
        if let Ok(category) = &result {
            tracing::info!(category_id = %category.id, "category created");
        }
        self.observe(epoch, result)
    }

    /// Admin-only on the server; the client check in `routes::guard` is
    /// advisory.
    ///
    /// # Errors
    ///
    /// Returns the API failure, or `Authentication` without a token.
    pub async fn update_category(&self, id: Uuid, input: &CategoryInput) -> Result<Category, ApiError> {
        let (token, epoch) = self.credential()?;
        let result = self.api.update_category(&token, id, input).await;
        if let Ok(category) = &result {
            tracing::info!(category_id = %category.id, "category updated");
        }
        self.observe(epoch, result)
    }

    /// # Errors
    ///
    /// Returns the API failure, or `Authentication` without a token.
    pub async fn delete_category(&self, id: Uuid) -> Result<(), ApiError> {
        let (token, epoch) = self.credential()?;
        let result = self.api.delete_category(&token, id).await;
        if result.is_ok() {
            tracing::info!(category_id = %id, "category deleted");
        }
        self.observe(epoch, result)
    }

    // =========================================================================
    // PRODUCTS
    // =========================================================================

    /// # Errors
    ///
    /// Returns the API failure.
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let (session, epoch) = self.session.get_with_epoch();
        let result = self.api.list_products(session.token.as_deref()).await;
        self.observe(epoch, result)
    }

    /// # Errors
    ///
    /// Returns the API failure.
    pub async fn get_product(&self, id: Uuid) -> Result<Product, ApiError> {
        let (session, epoch) = self.session.get_with_epoch();
        let result = self.api.get_product(session.token.as_deref(), id).await;
        self.observe(epoch, result)
    }

    /// # Errors
    ///
    /// Returns the API failure, or `Authentication` without a token.
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        let (token, epoch) = self.credential()?;
        let result = self.api.create_product(&token, input).await;
        if let Ok(product) = &result {
            tracing::info!(product_id = %product.id, "product created");
        }
        self.observe(epoch, result)
    }

    /// # Errors
    ///
    /// Returns the API failure, or `Authentication` without a token.
    pub async fn update_product(&self, id: Uuid, input: &ProductInput) -> Result<Product, ApiError> {
        let (token, epoch) = self.credential()?;
        let result = self.api.update_product(&token, id, input).await;
        if let Ok(product) = &result {
            tracing::info!(product_id = %product.id, "product updated");
        }
        self.observe(epoch, result)
    }

    /// # Errors
    ///
    /// Returns the API failure, or `Authentication` without a token.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ApiError> {
        let (token, epoch) = self.credential()?;
        let result = self.api.delete_product(&token, id).await;
        if result.is_ok() {
            tracing::info!(product_id = %id, "product deleted");
        }
        self.observe(epoch, result)
    }
}
