//! In-memory `CatalogApi` used by service and app tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::net::api::CatalogApi;
use crate::net::types::{
    ApiError, Category, CategoryInput, Credentials, Product, ProductInput, Registration, User, UserId,
};

pub(crate) const GOOD_PASSWORD: &str = "correct horse";

pub(crate) fn user(is_admin: bool) -> User {
    User { id: UserId::Int(1), name: "Ada".into(), email: "ada@example.com".into(), is_admin }
}

pub(crate) fn credentials(password: &str) -> Credentials {
    Credentials { email: "ada@example.com".into(), password: password.into() }
}

pub(crate) struct FakeApi {
    pub token: String,
    pub profile: Mutex<Result<User, ApiError>>,
    pub logout_result: Mutex<Result<(), ApiError>>,
    pub catalog_error: Mutex<Option<ApiError>>,
    pub categories: Mutex<Vec<Category>>,
    pub products: Mutex<Vec<Product>>,
    pub me_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    /// Tokens seen on catalog calls, in order.
    pub seen_tokens: Mutex<Vec<Option<String>>>,
    pub hold_me: AtomicBool,
    pub hold_logout: AtomicBool,
    pub gate: Notify,
}

impl FakeApi {
    pub fn new(is_admin: bool) -> Self {
        Self {
            token: "fake-token".into(),
            profile: Mutex::new(Ok(user(is_admin))),
            logout_result: Mutex::new(Ok(())),
            catalog_error: Mutex::new(None),
            categories: Mutex::new(Vec::new()),
            products: Mutex::new(Vec::new()),
            me_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            seen_tokens: Mutex::new(Vec::new()),
            hold_me: AtomicBool::new(false),
            hold_logout: AtomicBool::new(false),
            gate: Notify::new(),
        }
    }

    pub fn set_profile(&self, result: Result<User, ApiError>) {
        *self.profile.lock().unwrap() = result;
    }

    pub fn set_logout(&self, result: Result<(), ApiError>) {
        *self.logout_result.lock().unwrap() = result;
    }

    pub fn fail_catalog_with(&self, err: ApiError) {
        *self.catalog_error.lock().unwrap() = Some(err);
    }

    fn catalog_call(&self, token: Option<&str>) -> Result<(), ApiError> {
        self.seen_tokens.lock().unwrap().push(token.map(str::to_owned));
        match self.catalog_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        if credentials.password == GOOD_PASSWORD {
            Ok(self.token.clone())
        } else {
            Err(ApiError::Authentication(vec!["Provided email or password is incorrect".into()]))
        }
    }

    async fn register(&self, registration: &Registration) -> Result<String, ApiError> {
        if registration.password == registration.password_confirmation {
            Ok(self.token.clone())
        } else {
            Err(ApiError::Validation(vec!["The password field confirmation does not match.".into()]))
        }
    }

    async fn logout(&self, _token: &str) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.hold_logout.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        self.logout_result.lock().unwrap().clone()
    }

    async fn me(&self, token: &str) -> Result<User, ApiError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        if self.hold_me.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        if token != self.token {
            return Err(ApiError::Authentication(vec!["Unauthenticated.".into()]));
        }
        self.profile.lock().unwrap().clone()
    }

    async fn list_categories(&self, token: Option<&str>) -> Result<Vec<Category>, ApiError> {
        self.catalog_call(token)?;
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn get_category(&self, token: Option<&str>, id: Uuid) -> Result<Category, ApiError> {
        self.catalog_call(token)?;
        self.categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(ApiError::Server { status: 404, messages: vec!["Fetch category failed".into()] })
    }

    async fn create_category(&self, token: &str, input: &CategoryInput) -> Result<Category, ApiError> {
        self.catalog_call(Some(token))?;
        let category = Category { id: Uuid::new_v4(), name: input.name.clone(), products: Vec::new() };
        self.categories.lock().unwrap().push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, token: &str, id: Uuid, input: &CategoryInput) -> Result<Category, ApiError> {
        self.catalog_call(Some(token))?;
        let mut categories = self.categories.lock().unwrap();
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ApiError::Server { status: 404, messages: vec!["Update category failed".into()] })?;
        category.name.clone_from(&input.name);
        Ok(category.clone())
    }

    async fn delete_category(&self, token: &str, id: Uuid) -> Result<(), ApiError> {
        self.catalog_call(Some(token))?;
        self.categories.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn list_products(&self, token: Option<&str>) -> Result<Vec<Product>, ApiError> {
        self.catalog_call(token)?;
        Ok(self.products.lock().unwrap().clone())
    }

    async fn get_product(&self, token: Option<&str>, id: Uuid) -> Result<Product, ApiError> {
        self.catalog_call(token)?;
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ApiError::Server { status: 404, messages: vec!["Fetch product failed".into()] })
    }

    async fn create_product(&self, token: &str, input: &ProductInput) -> Result<Product, ApiError> {
        self.catalog_call(Some(token))?;
        let product = Product {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            category_id: Some(input.category_id),
            colors: input
                .colors
                .iter()
                .map(|(name, hex_code)| crate::net::types::Color { name: name.clone(), hex_code: hex_code.clone() })
                .collect(),
        };
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, token: &str, id: Uuid, input: &ProductInput) -> Result<Product, ApiError> {
        self.catalog_call(Some(token))?;
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ApiError::Server { status: 404, messages: vec!["Update product failed".into()] })?;
        product.name.clone_from(&input.name);
        product.price = input.price;
        Ok(product.clone())
    }

    async fn delete_product(&self, token: &str, id: Uuid) -> Result<(), ApiError> {
        self.catalog_call(Some(token))?;
        self.products.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }
}
