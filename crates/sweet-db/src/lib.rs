//! # sweet-db: SQLite Persistence for the Sweet Shop
//!
//! All database access lives here: the connection pool, embedded
//! migrations, CRUD repositories, and the inventory/purchase engine.
//!
//! ## Modules
//!
//! - [`pool`] - Pool configuration and the [`Database`] handle
//! - [`migrations`] - Embedded schema migrations
//! - [`repository`] - Users, sweets, and the inventory engine
//! - [`error`] - [`DbError`] / [`EngineError`]
//!
//! ## Concurrency Model
//!
//! Many requests run concurrently against the same pool; SQLite's single
//! writer plus WAL mode give concurrent readers. The only operations that
//! need cross-step atomicity are purchase and restock, which the
//! [`repository::inventory::InventoryEngine`] scopes to a transaction (or
//! a single guarded statement) on the affected sweet.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult, EngineError, EngineResult};
pub use pool::{Database, DbConfig};
pub use repository::inventory::InventoryEngine;
pub use repository::sweet::SweetRepository;
pub use repository::user::UserRepository;
