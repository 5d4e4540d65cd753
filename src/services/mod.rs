//! Session-aware operations layered over the catalog API.
//!
//! DESIGN
//! ======
//! `auth` owns every token transition; `catalog` reads the token from the
//! shared session for category and product calls.

pub mod auth;
pub mod catalog;

#[cfg(test)]
pub(crate) mod test_support;
