//! # User Repository
//!
//! Database operations for accounts.
//!
//! Passwords arrive here already hashed - the hashing primitive lives in
//! the API layer, this repository only stores and returns the hash.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::EngineResult;
use sweet_core::{Role, User};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user with the default `USER` role.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the email is already registered.
    /// The UNIQUE index is the duplicate check - no check-then-insert race.
    pub async fn insert(&self, email: &str, password_hash: &str) -> EngineResult<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        debug!(id = %user.id, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email (exact, case-sensitive as stored).
    pub async fn find_by_email(&self, email: &str) -> EngineResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID.
    pub async fn find_by_id(&self, id: &str) -> EngineResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Sets a user's role.
    ///
    /// There is no self-service promotion endpoint; this is the out-of-band
    /// elevation path used by the seed binary and operators.
    pub async fn set_role(&self, id: &str, role: Role) -> EngineResult<()> {
        debug!(id = %id, ?role, "Setting user role");

        sqlx::query(
            r#"
            UPDATE users SET role = ?2, updated_at = ?3 WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(role)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
