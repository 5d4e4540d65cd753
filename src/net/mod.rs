//! Network layer: wire types and the REST client for the catalog API.

pub mod api;
pub mod types;
