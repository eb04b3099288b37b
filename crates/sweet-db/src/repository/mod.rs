//! # Repository Layer
//!
//! Database access organized by aggregate:
//!
//! - [`user`] - Account storage and lookup
//! - [`sweet`] - Catalog CRUD and filtered search
//! - [`inventory`] - The purchase/restock engine (the only writer of
//!   stock quantity outside admin CRUD)

pub mod inventory;
pub mod sweet;
pub mod user;
