//! # Error Types
//!
//! Domain-specific error types for sweet-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sweet-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule failures                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  sweet-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP errors (in apps/api)                                             │
//! │  └── ApiError         - What the client sees (status + JSON body)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, field, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to exactly one HTTP status in the façade

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule failures.
///
/// These are terminal for the call that raised them; the engine never
/// retries them automatically.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Sweet cannot be found.
    #[error("Sweet not found: {0}")]
    SweetNotFound(String),

    /// No stock left to sell.
    ///
    /// ## When This Occurs
    /// - Purchasing a sweet whose quantity is 0
    /// - Losing the race for the last unit: two concurrent purchases at
    ///   quantity 1 resolve to one success and one `OutOfStock`
    #[error("Out of stock: {0}")]
    OutOfStock(String),

    /// The authenticated user id no longer resolves to a user record.
    ///
    /// ## When This Occurs
    /// - Token is valid but the database was reset
    /// - Forged/stale token referencing a deleted account
    #[error("User validation failed for {0}. Please login again.")]
    InvalidSession(String),

    /// Restock called with a non-positive quantity.
    #[error("Invalid restock quantity: {0} (must be a positive integer)")]
    InvalidRestockQuantity(i64),

    /// Deleting a sweet that purchase history still references.
    ///
    /// A purchase must not outlive the sweet it references, so the delete
    /// is blocked rather than cascading or orphaning.
    #[error("Sweet {id} has {purchases} purchase(s) and cannot be deleted")]
    HasPurchaseHistory { id: String, purchases: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements. Used for early
/// validation before business logic runs; reported with field-level detail.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric field must be strictly positive.
    #[error("{field} must be positive")]
    NotPositive { field: String },

    /// Numeric field must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Field doesn't match the expected format.
    #[error("{field} is invalid: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_field_context() {
        let err = ValidationError::Required {
            field: "name".into(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = CoreError::OutOfStock("sweet-1".into());
        assert_eq!(err.to_string(), "Out of stock: sweet-1");
    }

    #[test]
    fn validation_converts_into_core() {
        let err: CoreError = ValidationError::NotPositive {
            field: "price".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
