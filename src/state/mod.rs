//! Client-side session state.
//!
//! DESIGN
//! ======
//! `session` holds the in-memory token/profile pair; `storage` is the
//! durable key/value store the token is persisted into.

pub mod session;
pub mod storage;
