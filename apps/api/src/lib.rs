//! # Sweet Shop API
//!
//! Axum REST façade over the sweet-shop inventory system.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          sweet-api                                      │
//! │                                                                         │
//! │  Client ───► Router ───► AuthUser/AdminUser ───► Handlers               │
//! │                              (extract.rs)           │                   │
//! │                                                     ▼                   │
//! │                                       sweet-db (SQLite, transactions)   │
//! │                                                     │                   │
//! │              { JSON } ◄──── ApiError mapping ◄──────┘                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The router is exposed as a library function so integration tests can
//! drive it without a socket.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::auth::JwtManager;
use sweet_db::Database;

/// Shared application state: the database handle and the token manager.
///
/// Cheap to clone - `Database` wraps a pool and the manager is behind an
/// `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(db: Database, jwt: JwtManager) -> Self {
        AppState {
            db,
            jwt: Arc::new(jwt),
        }
    }
}

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/sweets",
            get(handlers::sweets::list).post(handlers::sweets::create),
        )
        .route("/sweets/search", get(handlers::sweets::search))
        .route("/sweets/history", get(handlers::sweets::history))
        .route(
            "/sweets/{id}",
            get(handlers::sweets::get_by_id)
                .put(handlers::sweets::update)
                .delete(handlers::sweets::remove),
        )
        .route("/sweets/{id}/purchase", post(handlers::sweets::purchase))
        .route("/sweets/{id}/restock", post(handlers::sweets::restock))
        .with_state(state)
}

/// `GET /` - welcome message.
async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to Sweet Shop API" }))
}

/// `GET /health` - liveness check, no auth.
async fn health_handler(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let status = if state.db.health_check().await {
        "ok"
    } else {
        "degraded"
    };
    Json(json!({ "status": status }))
}
