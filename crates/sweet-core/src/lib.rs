//! # sweet-core: Pure Domain Logic for the Sweet Shop
//!
//! This crate is the **heart** of the sweet shop. It contains the domain
//! types and business rules as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sweet Shop Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      apps/api (Axum)                            │   │
//! │  │    routes ──► auth extractors ──► handlers ──► JSON responses   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sweet-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐      ┌────────────┐      ┌────────────┐        │   │
//! │  │   │   types   │      │ validation │      │   error    │        │   │
//! │  │   │ User/Sweet│      │   rules    │      │  variants  │        │   │
//! │  │   │ Purchase  │      │   checks   │      │            │        │   │
//! │  │   └───────────┘      └────────────┘      └────────────┘        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   sweet-db (Database Layer)                     │   │
//! │  │        SQLite queries, migrations, inventory transaction        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: validation is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use sweet_core::Sweet` instead of
// `use sweet_core::types::Sweet`

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum accepted password length for registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Quantity sold per purchase call.
///
/// ## Why a constant?
/// The purchase operation buys exactly one unit per call; multi-item carts
/// are out of scope. Keeping the number named makes the purchase record's
/// `quantity` column self-explanatory.
pub const PURCHASE_UNIT: i64 = 1;
