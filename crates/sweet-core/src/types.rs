//! # Domain Types
//!
//! Core domain types used throughout the sweet shop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │      Sweet      │   │    Purchase     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  email (unique) │   │  name           │   │  user_id (FK)   │       │
//! │  │  password_hash  │   │  category       │   │  sweet_id (FK)  │       │
//! │  │  role           │   │  price          │   │  quantity       │       │
//! │  │                 │   │  quantity       │   │  total_price    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Purchase.total_price is a SNAPSHOT of Sweet.price at purchase time,   │
//! │  never a live join. Later price edits leave history unchanged.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// User role controlling access to admin routes.
///
/// Kept as a simple two-variant enum; a permissions graph is deliberately
/// out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular customer: browse, search, purchase, view own history.
    User,
    /// Administrator: everything above plus create/update/delete/restock.
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl Role {
    /// Whether this role may call admin-only operations.
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account.
///
/// The credential is stored as a salted hash only; `password_hash` is never
/// serialized into responses.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Email address - unique, stored as given (case-sensitive).
    pub email: String,

    /// Salted argon2 hash of the password. Never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Access role. Defaults to [`Role::User`]; elevated out-of-band only.
    pub role: Role,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sweet
// =============================================================================

/// A catalog item with price and stock quantity.
///
/// ## Invariant
/// `quantity` is never negative. It is mutated only by admin CRUD, restock
/// (additive), and purchase (subtractive by exactly one per call) - the
/// inventory engine owns the read-modify-write on it during purchase and
/// restock.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Sweet {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name. Non-empty.
    pub name: String,

    /// Category label used for filtering. Non-empty.
    pub category: String,

    /// Unit price. Positive, currency-agnostic decimal.
    pub price: f64,

    /// Units on hand. Never negative.
    pub quantity: i64,

    /// Optional image URL or path.
    pub image: Option<String>,

    /// Optional description or history of the sweet.
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a sweet. Validated before insert.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update of a sweet. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweetUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Search filters for the catalog. All provided filters AND together;
/// none provided behaves like list-all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweetFilter {
    /// Substring match on name (case-insensitive for ASCII).
    pub name: Option<String>,
    /// Substring match on category (case-insensitive for ASCII).
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
}

// =============================================================================
// Purchase
// =============================================================================

/// An immutable record of one unit of a sweet bought by one user.
///
/// ## Snapshot Pattern
/// `total_price` captures the sweet's price at transaction time. Later
/// price edits never retroactively change historical totals.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Buyer. A purchase never outlives its user.
    pub user_id: String,

    /// Purchased sweet. A purchase never outlives its sweet.
    pub sweet_id: String,

    /// Units bought. Fixed at 1 per purchase call.
    pub quantity: i64,

    /// Price snapshot at purchase time.
    pub total_price: f64,

    pub created_at: DateTime<Utc>,
}

/// One line of a user's purchase history, joined to the sweet's name.
/// Ordered newest first by the repository.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PurchaseHistoryEntry {
    pub id: String,
    pub sweet_name: String,
    pub total_price: f64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
