//! REST client for the catalog API.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`. Transport failures become
//! `ApiError::Network`; non-success statuses are classified from the
//! response body by `types::classify_failure`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::types::{
    ApiError, Category, CategoryInput, Credentials, DataEnvelope, Product, ProductInput, Registration,
    TokenResponse, User, classify_failure,
};
use crate::config::ClientConfig;

/// Collaborator contract. Authenticated calls take the bearer token
/// explicitly; the client holds no session state of its own.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError>;
    async fn register(&self, registration: &Registration) -> Result<String, ApiError>;
    async fn logout(&self, token: &str) -> Result<(), ApiError>;
    async fn me(&self, token: &str) -> Result<User, ApiError>;

    async fn list_categories(&self, token: Option<&str>) -> Result<Vec<Category>, ApiError>;
    async fn get_category(&self, token: Option<&str>, id: Uuid) -> Result<Category, ApiError>;
    async fn create_category(&self, token: &str, input: &CategoryInput) -> Result<Category, ApiError>;
    async fn update_category(&self, token: &str, id: Uuid, input: &CategoryInput) -> Result<Category, ApiError>;
    async fn delete_category(&self, token: &str, id: Uuid) -> Result<(), ApiError>;

    async fn list_products(&self, token: Option<&str>) -> Result<Vec<Product>, ApiError>;
    async fn get_product(&self, token: Option<&str>, id: Uuid) -> Result<Product, ApiError>;
    async fn create_product(&self, token: &str, input: &ProductInput) -> Result<Product, ApiError>;
    async fn update_product(&self, token: &str, id: Uuid, input: &ProductInput) -> Result<Product, ApiError>;
    async fn delete_product(&self, token: &str, id: Uuid) -> Result<(), ApiError>;
}

/// `reqwest`-backed implementation of [`CatalogApi`].
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogApi {
    /// Build a client from config timeouts and base URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { http, base_url: config.api_base_url.clone() })
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let builder = self.http.request(method, url).header(reqwest::header::ACCEPT, "application/json");
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let resp = builder.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "catalog api request failed");
        Err(classify_failure(status.as_u16(), &body))
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let resp = Self::send(builder).await?;
        resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn data<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        Self::json::<DataEnvelope<T>>(builder).await.map(|env| env.data)
    }

    async fn empty(builder: RequestBuilder) -> Result<(), ApiError> {
        Self::send(builder).await.map(|_| ())
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let req = self.request(Method::POST, "/login", None).json(credentials);
        Self::json::<TokenResponse>(req).await?.into_token()
    }

    async fn register(&self, registration: &Registration) -> Result<String, ApiError> {
        let req = self.request(Method::POST, "/register", None).json(registration);
        Self::json::<TokenResponse>(req).await?.into_token()
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        Self::empty(self.request(Method::POST, "/logout", Some(token))).await
    }

    async fn me(&self, token: &str) -> Result<User, ApiError> {
        Self::json(self.request(Method::GET, "/me", Some(token))).await
    }

    async fn list_categories(&self, token: Option<&str>) -> Result<Vec<Category>, ApiError> {
        Self::data(self.request(Method::GET, "/categories", token)).await
    }

    async fn get_category(&self, token: Option<&str>, id: Uuid) -> Result<Category, ApiError> {
        Self::data(self.request(Method::GET, &format!("/categories/{id}"), token)).await
    }

    async fn create_category(&self, token: &str, input: &CategoryInput) -> Result<Category, ApiError> {
        let req = self.request(Method::POST, "/categories", Some(token)).json(input);
        Self::data(req).await
    }

    async fn update_category(&self, token: &str, id: Uuid, input: &CategoryInput) -> Result<Category, ApiError> {
        let req = self.request(Method::PUT, &format!("/categories/{id}"), Some(token)).json(input);
        Self::data(req).await
    }

    async fn delete_category(&self, token: &str, id: Uuid) -> Result<(), ApiError> {
        Self::empty(self.request(Method::DELETE, &format!("/categories/{id}"), Some(token))).await
    }

    async fn list_products(&self, token: Option<&str>) -> Result<Vec<Product>, ApiError> {
        Self::data(self.request(Method::GET, "/products", token)).await
    }

    async fn get_product(&self, token: Option<&str>, id: Uuid) -> Result<Product, ApiError> {
        Self::data(self.request(Method::GET, &format!("/products/{id}"), token)).await
    }

    async fn create_product(&self, token: &str, input: &ProductInput) -> Result<Product, ApiError> {
        let req = self.request(Method::POST, "/products", Some(token)).json(input);
        Self::data(req).await
    }

    async fn update_product(&self, token: &str, id: Uuid, input: &ProductInput) -> Result<Product, ApiError> {
        let req = self.request(Method::PUT, &format!("/products/{id}"), Some(token)).json(input);
        Self::data(req).await
    }

    async fn delete_product(&self, token: &str, id: Uuid) -> Result<(), ApiError> {
        Self::empty(self.request(Method::DELETE, &format!("/products/{id}"), Some(token))).await
    }
}
