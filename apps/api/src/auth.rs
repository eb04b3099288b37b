//! Authentication primitives: JWT issue/verify and password hashing.
//!
//! Tokens carry the full identity claim (id, email, role) so verification
//! is stateless - no session store lookup. The tradeoff: a role change
//! only takes effect when the token expires; a revocation list is
//! explicitly out of scope.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use sweet_core::{Role, User};

// =============================================================================
// JWT
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// User's email at issue time
    pub email: String,

    /// Role claim checked by the admin gate
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Generate a signed, time-bounded bearer token for a user.
    pub fn generate_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {e}")))
    }

    /// Validate signature and expiry, returning the decoded claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| ApiError::Unauthorized("Invalid token".to_string()))?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from an authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password with argon2id and a fresh random salt.
///
/// The output is a PHC string (`$argon2id$...`) embedding the salt and
/// parameters; it is the only credential form ever stored.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))
}

/// Verifies a password against a stored PHC hash string.
///
/// An unparseable hash verifies as false rather than erroring - the caller
/// reports the same `Invalid credentials` either way.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user(role: Role) -> User {
        User {
            id: "user-001".into(),
            email: "a@x.com".into(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager.generate_token(&test_user(Role::Admin)).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "user-001");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);
        let other = JwtManager::new("other-secret".to_string(), 3600);

        let token = manager.generate_token(&test_user(Role::User)).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Lifetime well past the default 60s validation leeway.
        let manager = JwtManager::new("test-secret".to_string(), -120);

        let token = manager.generate_token(&test_user(Role::User)).unwrap();
        assert!(manager.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("abc.def.ghi"), None);
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("secret1").unwrap();
        assert_ne!(hash, "secret1");
        assert!(hash.starts_with("$argon2"));

        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
        assert!(!verify_password("secret1", "not-a-phc-string"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        // Fresh salt per hash
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret1", &a));
        assert!(verify_password("secret1", &b));
    }
}
