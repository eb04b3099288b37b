//! Access-control extractors.
//!
//! Two capability checks, composed per route by asking for the matching
//! extractor in the handler signature:
//!
//! - [`AuthUser`] - "has a valid token": parses the `Authorization: Bearer`
//!   header, verifies signature and expiry, and attaches the decoded
//!   identity claim. Failure → 401.
//! - [`AdminUser`] - "token role is ADMIN": runs [`AuthUser`] first, then
//!   checks the role claim. Failure → 403.
//!
//! ```text
//! GET  /sweets              → list(auth: AuthUser, ...)
//! POST /sweets              → create(admin: AdminUser, ...)
//! POST /sweets/{id}/restock → restock(admin: AdminUser, ...)
//! ```

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::{extract_bearer_token, Claims};
use crate::error::ApiError;
use crate::AppState;

/// The authenticated caller's identity claim.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
}

impl AuthUser {
    /// The caller's user id (token subject).
    pub fn user_id(&self) -> &str {
        &self.claims.sub
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthorized("Access denied: No token provided".to_string())
            })?;

        let token = extract_bearer_token(header).ok_or_else(|| {
            ApiError::Unauthorized("Access denied: No token provided".to_string())
        })?;

        let claims = state.jwt.validate_token(token)?;

        Ok(AuthUser { claims })
    }
}

/// An authenticated caller whose role claim is `ADMIN`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;

        if !auth.claims.role.is_admin() {
            return Err(ApiError::Forbidden(
                "Access denied: Admins only".to_string(),
            ));
        }

        Ok(AdminUser(auth))
    }
}
