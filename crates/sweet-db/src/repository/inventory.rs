//! # Inventory/Purchase Engine
//!
//! The one component allowed to run the read-modify-write sequence on a
//! sweet's stock quantity. Everything here is about making "check stock,
//! decrement, record purchase" a single indivisible unit.
//!
//! ## The Purchase Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  purchase(sweet_id, user_id)                            │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  UPDATE sweets SET quantity = quantity - 1                              │
//! │  WHERE id = ? AND quantity >= 1                                         │
//! │  RETURNING price              ← check + decrement + price snapshot      │
//! │    │                            in ONE statement under the write lock   │
//! │    ├── no row? ── sweet exists? ──► OutOfStock : SweetNotFound          │
//! │    ▼                                                                    │
//! │  SELECT 1 FROM users WHERE id = ?                                       │
//! │    ├── no row? ──► InvalidSession (rollback restores the unit)          │
//! │    ▼                                                                    │
//! │  INSERT INTO purchases (quantity = 1, total_price = snapshot)           │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Two concurrent purchases at quantity = 1: SQLite admits one writer,    │
//! │  the first guarded UPDATE wins, the loser matches zero rows and         │
//! │  observes OutOfStock. Quantity never goes negative.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A check done outside the transaction would be a correctness bug: two
//! callers could both pass the check before either decrements. The guarded
//! WHERE clause *is* the check, so there is nothing to interleave with.
//!
//! ## Restock: Delta Updates
//! ```text
//! ❌ WRONG: absolute update (lost-update race)
//!    UPDATE sweets SET quantity = 7 WHERE id = ?
//!
//! ✅ CORRECT: delta update
//!    UPDATE sweets SET quantity = quantity + 10 WHERE id = ?
//!
//! Concurrent restocks of +10 and +5 always net +15, never +max(10, 5).
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use sweet_core::{CoreError, Purchase, PurchaseHistoryEntry, Sweet, PURCHASE_UNIT};

/// The inventory/purchase engine.
///
/// ## Ownership
/// This engine exclusively owns stock mutation during purchase and restock.
/// Admin CRUD may set an absolute quantity through the sweet repository,
/// but no other component touches the counter.
#[derive(Debug, Clone)]
pub struct InventoryEngine {
    pool: SqlitePool,
}

impl InventoryEngine {
    /// Creates a new InventoryEngine.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryEngine { pool }
    }

    /// Buys exactly one unit of a sweet for a user.
    ///
    /// Atomically: verifies the sweet exists with stock ≥ 1, verifies the
    /// user still resolves to a real record, decrements stock by one, and
    /// appends one purchase row capturing the price at that instant. Any
    /// failure rolls the whole unit back.
    ///
    /// ## Errors
    /// - [`CoreError::SweetNotFound`] - no sweet matches `sweet_id`
    /// - [`CoreError::OutOfStock`] - quantity < 1 (checked inside the
    ///   same atomic unit as the decrement)
    /// - [`CoreError::InvalidSession`] - `user_id` doesn't resolve to a
    ///   user (stale or forged token)
    ///
    /// ## Retry Semantics
    /// At-most-one-attempt: the engine never retries. A caller re-sending
    /// the request re-runs the full check-and-decrement, so retries are
    /// safe with respect to the invariant - each success is simply a new,
    /// independent purchase.
    pub async fn purchase(&self, sweet_id: &str, user_id: &str) -> EngineResult<Purchase> {
        debug!(sweet_id = %sweet_id, user_id = %user_id, "Processing purchase");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Guarded decrement first: the stock check, the write, and the
        // price snapshot are one statement, executed under the write lock.
        let price: Option<f64> = sqlx::query_scalar(
            r#"
            UPDATE sweets
            SET quantity = quantity - 1, updated_at = ?2
            WHERE id = ?1 AND quantity >= 1
            RETURNING price
            "#,
        )
        .bind(sweet_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let price = match price {
            Some(price) => price,
            None => {
                // Zero rows: absent sweet or empty shelf. Same transaction,
                // so the answer can't shift under us.
                let exists: Option<String> =
                    sqlx::query_scalar("SELECT id FROM sweets WHERE id = ?1")
                        .bind(sweet_id)
                        .fetch_optional(&mut *tx)
                        .await?;

                return Err(EngineError::Core(match exists {
                    Some(_) => CoreError::OutOfStock(sweet_id.to_string()),
                    None => CoreError::SweetNotFound(sweet_id.to_string()),
                }));
            }
        };

        // Token may be valid while the account is gone (DB reset, deleted
        // user). Dropping the transaction restores the decremented unit.
        let user_exists: Option<String> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        if user_exists.is_none() {
            return Err(EngineError::Core(CoreError::InvalidSession(
                user_id.to_string(),
            )));
        }

        let purchase = Purchase {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            sweet_id: sweet_id.to_string(),
            quantity: PURCHASE_UNIT,
            total_price: price,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO purchases (id, user_id, sweet_id, quantity, total_price, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&purchase.id)
        .bind(&purchase.user_id)
        .bind(&purchase.sweet_id)
        .bind(purchase.quantity)
        .bind(purchase.total_price)
        .bind(purchase.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(purchase_id = %purchase.id, total_price = purchase.total_price, "Purchase recorded");
        Ok(purchase)
    }

    /// Adds stock to a sweet and returns the updated snapshot.
    ///
    /// A single delta-based statement: concurrent restocks are additive
    /// and concurrent purchases serialize against it on the write lock.
    ///
    /// ## Errors
    /// - [`CoreError::InvalidRestockQuantity`] - `added_quantity` ≤ 0
    /// - [`CoreError::SweetNotFound`] - no sweet matches
    pub async fn restock(&self, sweet_id: &str, added_quantity: i64) -> EngineResult<Sweet> {
        if added_quantity <= 0 {
            return Err(EngineError::Core(CoreError::InvalidRestockQuantity(
                added_quantity,
            )));
        }

        debug!(sweet_id = %sweet_id, added_quantity, "Restocking sweet");

        let sweet = sqlx::query_as::<_, Sweet>(
            r#"
            UPDATE sweets
            SET quantity = quantity + ?2, updated_at = ?3
            WHERE id = ?1
            RETURNING id, name, category, price, quantity, image, description,
                      created_at, updated_at
            "#,
        )
        .bind(sweet_id)
        .bind(added_quantity)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| EngineError::Core(CoreError::SweetNotFound(sweet_id.to_string())))?;

        Ok(sweet)
    }

    /// Returns a user's purchase history, newest first.
    pub async fn history(&self, user_id: &str) -> EngineResult<Vec<PurchaseHistoryEntry>> {
        let history = sqlx::query_as::<_, PurchaseHistoryEntry>(
            r#"
            SELECT p.id, s.name AS sweet_name, p.total_price, p.quantity, p.created_at
            FROM purchases p
            JOIN sweets s ON s.id = p.sweet_id
            WHERE p.user_id = ?1
            ORDER BY p.created_at DESC, p.rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::EngineError;
    use crate::pool::{Database, DbConfig};
    use sweet_core::{CoreError, NewSweet, SweetUpdate};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_sweet(db: &Database, name: &str, price: f64, quantity: i64) -> String {
        db.sweets()
            .insert(&NewSweet {
                name: name.to_string(),
                category: "Chocolate".to_string(),
                price,
                quantity,
                image: None,
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_user(db: &Database, email: &str) -> String {
        db.users().insert(email, "hash").await.unwrap().id
    }

    fn assert_out_of_stock(err: EngineError) {
        assert!(matches!(err, EngineError::Core(CoreError::OutOfStock(_))));
    }

    #[tokio::test]
    async fn purchase_decrements_and_records_one_row() {
        let db = test_db().await;
        let sweet_id = seed_sweet(&db, "Dairy Milk", 10.0, 5).await;
        let user_id = seed_user(&db, "a@x.com").await;

        let purchase = db.inventory().purchase(&sweet_id, &user_id).await.unwrap();
        assert_eq!(purchase.quantity, 1);
        assert_eq!(purchase.total_price, 10.0);

        let sweet = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(sweet.quantity, 4);

        let history = db.inventory().history(&user_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sweet_name, "Dairy Milk");
        assert_eq!(history[0].total_price, 10.0);
        assert_eq!(history[0].quantity, 1);
    }

    #[tokio::test]
    async fn purchase_at_zero_stock_fails_and_writes_nothing() {
        let db = test_db().await;
        let sweet_id = seed_sweet(&db, "Munch", 10.0, 0).await;
        let user_id = seed_user(&db, "a@x.com").await;

        let err = db.inventory().purchase(&sweet_id, &user_id).await.unwrap_err();
        assert_out_of_stock(err);

        let sweet = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(sweet.quantity, 0);
        assert!(db.inventory().history(&user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn purchase_unknown_sweet_is_not_found() {
        let db = test_db().await;
        let user_id = seed_user(&db, "a@x.com").await;

        let err = db.inventory().purchase("missing", &user_id).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::SweetNotFound(_))
        ));
    }

    #[tokio::test]
    async fn purchase_with_stale_user_rolls_back_the_decrement() {
        let db = test_db().await;
        let sweet_id = seed_sweet(&db, "Gems", 5.0, 3).await;

        let err = db
            .inventory()
            .purchase(&sweet_id, "deleted-user")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::InvalidSession(_))
        ));

        // The rollback restored the unit the guarded update took.
        let sweet = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(sweet.quantity, 3);
    }

    #[tokio::test]
    async fn price_snapshot_survives_later_price_edits() {
        let db = test_db().await;
        let sweet_id = seed_sweet(&db, "KitKat", 25.0, 10).await;
        let user_id = seed_user(&db, "a@x.com").await;

        db.inventory().purchase(&sweet_id, &user_id).await.unwrap();

        db.sweets()
            .update(
                &sweet_id,
                &SweetUpdate {
                    price: Some(99.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let history = db.inventory().history(&user_id).await.unwrap();
        assert_eq!(history[0].total_price, 25.0);

        // A fresh purchase snapshots the new price.
        db.inventory().purchase(&sweet_id, &user_id).await.unwrap();
        let history = db.inventory().history(&user_id).await.unwrap();
        assert_eq!(history[0].total_price, 99.0);
        assert_eq!(history[1].total_price, 25.0);
    }

    #[tokio::test]
    async fn retried_purchase_is_a_new_independent_purchase() {
        let db = test_db().await;
        let sweet_id = seed_sweet(&db, "Melody", 2.0, 5).await;
        let user_id = seed_user(&db, "a@x.com").await;

        // Same sweet, same user, twice: not deduplicated, stock stays exact.
        db.inventory().purchase(&sweet_id, &user_id).await.unwrap();
        db.inventory().purchase(&sweet_id, &user_id).await.unwrap();

        let sweet = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(sweet.quantity, 3);
        assert_eq!(db.inventory().history(&user_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let db = test_db().await;
        let first = seed_sweet(&db, "First", 1.0, 5).await;
        let second = seed_sweet(&db, "Second", 2.0, 5).await;
        let user_id = seed_user(&db, "a@x.com").await;

        db.inventory().purchase(&first, &user_id).await.unwrap();
        db.inventory().purchase(&second, &user_id).await.unwrap();

        let history = db.inventory().history(&user_id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sweet_name, "Second");
        assert_eq!(history[1].sweet_name, "First");
    }

    #[tokio::test]
    async fn restock_is_additive_and_refreshes_timestamp() {
        let db = test_db().await;
        let sweet_id = seed_sweet(&db, "Gems", 5.0, 10).await;
        let before = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();

        let sweet = db.inventory().restock(&sweet_id, 15).await.unwrap();
        assert_eq!(sweet.quantity, 25);
        assert!(sweet.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn restock_rejects_non_positive_quantities() {
        let db = test_db().await;
        let sweet_id = seed_sweet(&db, "Gems", 5.0, 10).await;

        for bad in [0, -5] {
            let err = db.inventory().restock(&sweet_id, bad).await.unwrap_err();
            assert!(matches!(
                err,
                EngineError::Core(CoreError::InvalidRestockQuantity(_))
            ));
        }

        let err = db.inventory().restock("missing", 5).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::SweetNotFound(_))
        ));
    }

    // =========================================================================
    // Concurrency Properties
    // =========================================================================
    // A single-connection pool serializes every transaction at acquire time,
    // which would mask a broken check-then-act purchase. These tests run on
    // a file-backed database with several connections so transactions
    // genuinely contend for SQLite's write lock.

    async fn contended_db() -> (Database, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "sweet-inventory-{}.db",
            uuid::Uuid::new_v4()
        ));
        let db = Database::new(DbConfig::new(&path).max_connections(4))
            .await
            .unwrap();
        (db, path)
    }

    async fn drop_contended_db(db: Database, path: std::path::PathBuf) {
        db.close().await;
        for ext in ["db", "db-wal", "db-shm"] {
            let _ = std::fs::remove_file(path.with_extension(ext));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_purchases_of_last_unit_yield_exactly_one_success() {
        let (db, path) = contended_db().await;
        let sweet_id = seed_sweet(&db, "Last One", 10.0, 1).await;
        let user_id = seed_user(&db, "a@x.com").await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let db = db.clone();
            let sweet_id = sweet_id.clone();
            let user_id = user_id.clone();
            handles.push(tokio::spawn(async move {
                db.inventory().purchase(&sweet_id, &user_id).await
            }));
        }

        let mut successes = 0;
        let mut out_of_stock = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(EngineError::Core(CoreError::OutOfStock(_))) => out_of_stock += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(out_of_stock, 7);

        let sweet = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(sweet.quantity, 0);
        assert_eq!(db.inventory().history(&user_id).await.unwrap().len(), 1);

        drop_contended_db(db, path).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_purchases_never_drive_stock_negative() {
        let (db, path) = contended_db().await;
        let sweet_id = seed_sweet(&db, "Scarce", 3.0, 5).await;
        let user_id = seed_user(&db, "a@x.com").await;

        let mut handles = Vec::new();
        for _ in 0..12 {
            let db = db.clone();
            let sweet_id = sweet_id.clone();
            let user_id = user_id.clone();
            handles.push(tokio::spawn(async move {
                db.inventory().purchase(&sweet_id, &user_id).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 5);
        let sweet = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(sweet.quantity, 0);

        drop_contended_db(db, path).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_restocks_are_additive() {
        let (db, path) = contended_db().await;
        let sweet_id = seed_sweet(&db, "Restocked", 5.0, 0).await;

        let a = {
            let db = db.clone();
            let id = sweet_id.clone();
            tokio::spawn(async move { db.inventory().restock(&id, 10).await })
        };
        let b = {
            let db = db.clone();
            let id = sweet_id.clone();
            tokio::spawn(async move { db.inventory().restock(&id, 5).await })
        };

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        // +10 and +5 always net +15, regardless of interleaving.
        let sweet = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(sweet.quantity, 15);

        drop_contended_db(db, path).await;
    }
}
