//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Sweet Shop                         │
//! │                                                                         │
//! │  Client                          Rust Backend                           │
//! │  ──────                          ────────────                           │
//! │                                                                         │
//! │  POST /sweets/{id}/purchase                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler: Result<T, ApiError>                                    │  │
//! │  │         │                                                        │  │
//! │  │  ValidationError ── 400          CoreError::OutOfStock ── 400    │  │
//! │  │  CoreError::SweetNotFound ─ 404  CoreError::InvalidSession ─ 401 │  │
//! │  │  DbError::UniqueViolation ─ 400  anything unexpected ────── 500  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  { "error": "Out of stock" }  ← fixed status, fixed JSON shape          │
//! │                                                                         │
//! │  Internal detail (sqlx messages, stack context) is logged server-side   │
//! │  via tracing and NEVER leaks into the response body.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use sweet_core::{CoreError, ValidationError};
use sweet_db::{DbError, EngineError};

/// API error returned from handlers. Each variant maps to exactly one
/// HTTP status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range input. 400.
    #[error("{0}")]
    Validation(String),

    /// Duplicate registration. 400 with the legacy wording.
    #[error("Email already in use")]
    EmailInUse,

    /// No stock left for the requested sweet. 400.
    #[error("Out of stock")]
    OutOfStock,

    /// Login failure. Identical for unknown email and wrong password -
    /// must not leak which. 401.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired, or stale-session token. 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Valid token, insufficient role. 403.
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity absent. 404.
    #[error("{0}")]
    NotFound(String),

    /// State conflict (delete blocked by purchase history). 409.
    #[error("{0}")]
    Conflict(String),

    /// Unexpected persistence or logic failure. 500, detail suppressed.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::EmailInUse => StatusCode::BAD_REQUEST,
            ApiError::OutOfStock => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The Display message for Internal is the generic wording; the
        // real detail only goes to the log.
        if let ApiError::Internal(ref detail) = self {
            error!(detail = %detail, "Internal error");
        }

        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SweetNotFound(_) => ApiError::NotFound("Sweet not found".to_string()),
            CoreError::OutOfStock(_) => ApiError::OutOfStock,
            CoreError::InvalidSession(_) => ApiError::Unauthorized(
                "User validation failed. Please login again.".to_string(),
            ),
            CoreError::InvalidRestockQuantity(_) => {
                ApiError::Validation("Invalid quantity".to_string())
            }
            CoreError::HasPurchaseHistory { .. } => ApiError::Conflict(
                "Sweet has purchase history and cannot be deleted".to_string(),
            ),
            CoreError::Validation(inner) => inner.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { ref field } if field.contains("users.email") => {
                ApiError::EmailInUse
            }
            DbError::NotFound { entity, id } => ApiError::NotFound(format!("{entity} not found: {id}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Core(core) => core.into(),
            EngineError::Db(db) => db.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_is_fixed() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::EmailInUse.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::OutOfStock.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_suppressed() {
        let err = ApiError::Internal("sqlx: table sweets is locked".into());
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn email_unique_violation_maps_to_email_in_use() {
        let err: ApiError = DbError::UniqueViolation {
            field: "users.email".into(),
        }
        .into();
        assert!(matches!(err, ApiError::EmailInUse));
    }

    #[test]
    fn out_of_stock_maps_through_engine_error() {
        let err: ApiError = EngineError::Core(CoreError::OutOfStock("s1".into())).into();
        assert!(matches!(err, ApiError::OutOfStock));
        assert_eq!(err.to_string(), "Out of stock");
    }
}
