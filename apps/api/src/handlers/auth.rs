//! Auth handlers: account registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;
use crate::AppState;
use sweet_core::validation::{validate_email, validate_password};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` - create an account.
///
/// The credential is argon2-hashed before it reaches the repository; the
/// response never contains it. Duplicate emails surface as the UNIQUE
/// violation, so two racing registrations can't both win.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.trim();
    validate_email(email)?;
    validate_password(&req.password)?;

    let password_hash = hash_password(&req.password)?;
    let user = state.db.users().insert(email, &password_hash).await?;

    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": user,
        })),
    ))
}

/// `POST /auth/login` - authenticate and issue a bearer token.
///
/// Unknown email and wrong password take the same path to the same
/// `Invalid credentials` response - the caller learns nothing about
/// which half failed.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.trim();
    validate_email(email)?;

    let user = state.db.users().find_by_email(email).await?;

    let user = match user {
        Some(user) if verify_password(&req.password, &user.password_hash) => user,
        _ => return Err(ApiError::InvalidCredentials),
    };

    let token = state.jwt.generate_token(&user)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "role": user.role,
        },
    })))
}
