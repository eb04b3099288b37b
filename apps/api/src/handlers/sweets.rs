//! Catalog and inventory handlers.
//!
//! Route → capability mapping:
//!
//! | Route                         | Capability |
//! |-------------------------------|------------|
//! | GET    /sweets                | bearer     |
//! | GET    /sweets/search         | bearer     |
//! | GET    /sweets/history        | bearer     |
//! | GET    /sweets/{id}           | bearer     |
//! | POST   /sweets/{id}/purchase  | bearer     |
//! | POST   /sweets                | admin      |
//! | PUT    /sweets/{id}           | admin      |
//! | DELETE /sweets/{id}           | admin      |
//! | POST   /sweets/{id}/restock   | admin      |

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::extract::{AdminUser, AuthUser};
use crate::AppState;
use sweet_core::{NewSweet, Sweet, SweetFilter, SweetUpdate};

/// `GET /sweets` - list all sweets.
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Sweet>>, ApiError> {
    let sweets = state.db.sweets().list().await?;
    Ok(Json(sweets))
}

/// `GET /sweets/search?name&category&minPrice&maxPrice` - filtered list.
///
/// No filters provided returns everything, same as `GET /sweets`.
pub async fn search(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<SweetFilter>,
) -> Result<Json<Vec<Sweet>>, ApiError> {
    let sweets = state.db.sweets().search(&filter).await?;
    Ok(Json(sweets))
}

/// `GET /sweets/{id}` - fetch one sweet.
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Sweet>, ApiError> {
    let sweet = state
        .db
        .sweets()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sweet not found".to_string()))?;
    Ok(Json(sweet))
}

/// `GET /sweets/history` - the caller's purchase history, newest first.
pub async fn history(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let history = state.db.inventory().history(auth.user_id()).await?;
    Ok(Json(history))
}

/// `POST /sweets` - create a sweet. Admin only.
pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(new): Json<NewSweet>,
) -> Result<impl IntoResponse, ApiError> {
    let sweet = state.db.sweets().insert(&new).await?;
    info!(sweet_id = %sweet.id, name = %sweet.name, "Sweet created");
    Ok((StatusCode::CREATED, Json(sweet)))
}

/// `PUT /sweets/{id}` - partial update. Admin only.
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<SweetUpdate>,
) -> Result<Json<Sweet>, ApiError> {
    let sweet = state.db.sweets().update(&id, &update).await?;
    Ok(Json(sweet))
}

/// `DELETE /sweets/{id}` - remove a sweet. Admin only.
///
/// Blocked with 409 while purchase history references the sweet.
pub async fn remove(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.sweets().delete(&id).await?;
    info!(sweet_id = %id, "Sweet deleted");
    Ok(Json(json!({ "message": "Sweet deleted successfully" })))
}

/// `POST /sweets/{id}/purchase` - buy one unit.
///
/// The stock check, decrement, and purchase record are one atomic unit in
/// the inventory engine; this handler only reports the outcome.
pub async fn purchase(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let purchase = state.db.inventory().purchase(&id, auth.user_id()).await?;
    info!(
        purchase_id = %purchase.id,
        sweet_id = %id,
        user_id = %auth.user_id(),
        "Purchase successful"
    );
    Ok(Json(json!({ "message": "Purchase successful" })))
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    /// Units to add. Zero/negative (or missing) is rejected by the engine.
    #[serde(default)]
    pub quantity: i64,
}

/// `POST /sweets/{id}/restock` - add stock. Admin only.
pub async fn restock(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RestockRequest>,
) -> Result<Json<Sweet>, ApiError> {
    let sweet = state.db.inventory().restock(&id, req.quantity).await?;
    info!(sweet_id = %id, added = req.quantity, quantity = sweet.quantity, "Sweet restocked");
    Ok(Json(sweet))
}
