//! # Request Handlers
//!
//! Thin orchestration over sweet-db: parse, call, shape the response.
//!
//! - [`auth`] - register / login
//! - [`sweets`] - catalog CRUD, search, purchase, restock, history

pub mod auth;
pub mod sweets;
