//! Route table: path parsing and the guard each route sits behind.

pub mod guard;


use uuid::Uuid;

use guard::GuardKind;

/// Every navigable location of the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    SignIn,
    SignUp,
    Home,
    Categories,
    NewCategory,
    Category(Uuid),
    EditCategory(Uuid),
    Products,
    NewProduct,
    Product(Uuid),
    EditProduct(Uuid),
    NotFound,
}

impl Route {
    /// Landing route for authenticated visitors.
    pub const LANDING: Self = Self::Home;

    /// Parse a path. Unknown paths and malformed ids resolve to `NotFound`.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Home,
            ["signin"] => Self::SignIn,
            ["signup"] => Self::SignUp,
            ["categories"] => Self::Categories,
            ["categories", "new"] => Self::NewCategory,
            ["categories", id] => id_route(id, Self::Category),
            ["categories", id, "edit"] => id_route(id, Self::EditCategory),
            ["products"] => Self::Products,
            ["products", "new"] => Self::NewProduct,
            ["products", id] => id_route(id, Self::Product),
            ["products", id, "edit"] => id_route(id, Self::EditProduct),
            _ => Self::NotFound,
        }
    }

    /// Canonical path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::SignIn => "/signin".to_owned(),
            Self::SignUp => "/signup".to_owned(),
            Self::Home => "/".to_owned(),
            Self::Categories => "/categories".to_owned(),
            Self::NewCategory => "/categories/new".to_owned(),
            Self::Category(id) => format!("/categories/{id}"),
            Self::EditCategory(id) => format!("/categories/{id}/edit"),
            Self::Products => "/products".to_owned(),
            Self::NewProduct => "/products/new".to_owned(),
            Self::Product(id) => format!("/products/{id}"),
            Self::EditProduct(id) => format!("/products/{id}/edit"),
            Self::NotFound => "/404".to_owned(),
        }
    }

    /// Guard the route sits behind. `NotFound` is reachable by anyone.
    #[must_use]
    pub fn guard(&self) -> Option<GuardKind> {
        match self {
            Self::SignIn | Self::SignUp => Some(GuardKind::GuestOnly),
            Self::NotFound => None,
            _ => Some(GuardKind::AuthenticatedOnly),
        }
    }

    /// Routes whose view additionally requires the admin role.
    #[must_use]
    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::EditCategory(_))
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

fn id_route(raw: &str, build: fn(Uuid) -> Route) -> Route {
    Uuid::parse_str(raw).map_or(Route::NotFound, build)
}
