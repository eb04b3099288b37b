//! # Sweet Repository
//!
//! Catalog CRUD and filtered search over sweets.
//!
//! ## Search Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Filtered Search Works                            │
//! │                                                                         │
//! │  GET /sweets/search?name=kat&minPrice=5&maxPrice=30                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Each provided filter narrows the result (logical AND):                 │
//! │    name     → name LIKE '%kat%'       (substring)                       │
//! │    category → category LIKE '%...%'   (substring)                       │
//! │    minPrice → price >= min            (inclusive)                       │
//! │    maxPrice → price <= max            (inclusive)                       │
//! │                                                                         │
//! │  No filters provided ⇒ superset query: same result as list().           │
//! │                                                                         │
//! │  SQLite LIKE is case-insensitive for ASCII; that is the documented      │
//! │  behavior here ("KitKat" matches "kat").                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock quantity is written here only through admin CRUD; purchase and
//! restock go through the inventory engine.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use sweet_core::validation::{validate_new_sweet, validate_sweet_update};
use sweet_core::{CoreError, NewSweet, Sweet, SweetFilter, SweetUpdate};

/// Columns selected for every `Sweet` row.
const SWEET_COLUMNS: &str =
    "id, name, category, price, quantity, image, description, created_at, updated_at";

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct SweetRepository {
    pool: SqlitePool,
}

impl SweetRepository {
    /// Creates a new SweetRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SweetRepository { pool }
    }

    /// Lists all sweets in insertion order.
    pub async fn list(&self) -> EngineResult<Vec<Sweet>> {
        let sweets = sqlx::query_as::<_, Sweet>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sweets)
    }

    /// Searches sweets with optional filters, AND-combined.
    ///
    /// No filters provided behaves exactly like [`list`](Self::list):
    /// a search with no constraints is a superset query, not a vacuous one.
    pub async fn search(&self, filter: &SweetFilter) -> EngineResult<Vec<Sweet>> {
        debug!(?filter, "Searching sweets");

        let name_pattern = filter.name.as_ref().map(|n| format!("%{}%", n));
        let category_pattern = filter.category.as_ref().map(|c| format!("%{}%", c));

        let sweets = sqlx::query_as::<_, Sweet>(&format!(
            r#"
            SELECT {SWEET_COLUMNS}
            FROM sweets
            WHERE (?1 IS NULL OR name LIKE ?1)
              AND (?2 IS NULL OR category LIKE ?2)
              AND (?3 IS NULL OR price >= ?3)
              AND (?4 IS NULL OR price <= ?4)
            ORDER BY rowid
            "#
        ))
        .bind(name_pattern)
        .bind(category_pattern)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = sweets.len(), "Search returned sweets");
        Ok(sweets)
    }

    /// Gets a sweet by its ID.
    pub async fn get_by_id(&self, id: &str) -> EngineResult<Option<Sweet>> {
        let sweet = sqlx::query_as::<_, Sweet>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sweet)
    }

    /// Inserts a new sweet after validating its fields.
    pub async fn insert(&self, new: &NewSweet) -> EngineResult<Sweet> {
        validate_new_sweet(new)?;

        let now = Utc::now();
        let sweet = Sweet {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            category: new.category.trim().to_string(),
            price: new.price,
            quantity: new.quantity,
            image: new.image.clone(),
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %sweet.id, name = %sweet.name, "Inserting sweet");

        sqlx::query(
            r#"
            INSERT INTO sweets (id, name, category, price, quantity, image, description,
                                created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&sweet.id)
        .bind(&sweet.name)
        .bind(&sweet.category)
        .bind(sweet.price)
        .bind(sweet.quantity)
        .bind(&sweet.image)
        .bind(&sweet.description)
        .bind(sweet.created_at)
        .bind(sweet.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(sweet)
    }

    /// Applies a partial update and returns the updated sweet.
    ///
    /// One COALESCE-based statement: supplied fields overwrite, unsupplied
    /// fields stay untouched, and the whole write is atomic with respect to
    /// concurrent purchases and restocks.
    pub async fn update(&self, id: &str, update: &SweetUpdate) -> EngineResult<Sweet> {
        validate_sweet_update(update)?;

        debug!(id = %id, "Updating sweet");

        let name = update.name.as_ref().map(|n| n.trim().to_string());
        let category = update.category.as_ref().map(|c| c.trim().to_string());

        let sweet = sqlx::query_as::<_, Sweet>(&format!(
            r#"
            UPDATE sweets SET
                name = COALESCE(?2, name),
                category = COALESCE(?3, category),
                price = COALESCE(?4, price),
                quantity = COALESCE(?5, quantity),
                image = COALESCE(?6, image),
                description = COALESCE(?7, description),
                updated_at = ?8
            WHERE id = ?1
            RETURNING {SWEET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(update.price)
        .bind(update.quantity)
        .bind(&update.image)
        .bind(&update.description)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| EngineError::Core(CoreError::SweetNotFound(id.to_string())))?;

        Ok(sweet)
    }

    /// Deletes a sweet.
    ///
    /// ## Referential Integrity
    /// A purchase must not outlive the sweet it references, so a sweet with
    /// purchase history cannot be deleted - the call fails with
    /// [`CoreError::HasPurchaseHistory`] instead of cascading or orphaning.
    /// The check and the delete run in one transaction so a concurrent
    /// purchase cannot slip between them.
    pub async fn delete(&self, id: &str) -> EngineResult<()> {
        debug!(id = %id, "Deleting sweet");

        let mut tx = self.pool.begin().await?;

        let purchases: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM purchases WHERE sweet_id = ?1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if purchases > 0 {
            return Err(EngineError::Core(CoreError::HasPurchaseHistory {
                id: id.to_string(),
                purchases,
            }));
        }

        let result = sqlx::query("DELETE FROM sweets WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::Core(CoreError::SweetNotFound(id.to_string())));
        }

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
