//! # catalog-client
//!
//! Client for a product-catalog back-office API: token session handling,
//! route guards, and category/product operations.
//!
//! The session store is the single source of truth for authentication.
//! Route guards read it on every navigation; only the auth service writes
//! the token. See `app::App` for the wiring.

pub mod app;
pub mod config;
pub mod logging;
pub mod net;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;
