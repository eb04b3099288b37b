//! # Validation Module
//!
//! Input validation rules for the sweet shop.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP deserialization (serde)                                 │
//! │  └── Type validation (numbers are numbers, etc.)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  └── Non-empty names, positive prices, email shape, ...                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (email)                                        │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{NewSweet, SweetUpdate};
use crate::MIN_PASSWORD_LEN;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a sweet name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a category label.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 100 characters
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates an email address shape.
///
/// Deliberately minimal: one `@` with a non-empty local part and a domain
/// containing a dot. Full RFC 5322 parsing buys nothing here; the UNIQUE
/// constraint and the login roundtrip are the real gatekeepers.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid email address".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a registration password.
///
/// ## Rules
/// - At least [`MIN_PASSWORD_LEN`] characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price: strictly positive and finite.
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::NotPositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock quantity: non-negative integer.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates all fields of a new sweet before insert.
pub fn validate_new_sweet(sweet: &NewSweet) -> ValidationResult<()> {
    validate_name(&sweet.name)?;
    validate_category(&sweet.category)?;
    validate_price(sweet.price)?;
    validate_quantity(sweet.quantity)?;
    Ok(())
}

/// Validates the supplied fields of a partial update.
///
/// Unsupplied fields are skipped; a supplied field that violates its
/// constraint fails the whole update.
pub fn validate_sweet_update(update: &SweetUpdate) -> ValidationResult<()> {
    if let Some(ref name) = update.name {
        validate_name(name)?;
    }
    if let Some(ref category) = update.category {
        validate_category(category)?;
    }
    if let Some(price) = update.price {
        validate_price(price)?;
    }
    if let Some(quantity) = update.quantity {
        validate_quantity(quantity)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rejects_empty_and_whitespace() {
        assert!(validate_name("KitKat").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(201)).is_err());
    }

    #[test]
    fn category_rejects_empty() {
        assert!(validate_category("Chocolate").is_ok());
        assert!(validate_category("").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last@sub.example.org").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a@nodot").is_err());
        assert!(validate_email("a@.com").is_err());
        assert!(validate_email("a b@x.com").is_err());
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("secret").is_ok()); // exactly 6
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn price_must_be_positive_and_finite() {
        assert!(validate_price(0.01).is_ok());
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn quantity_must_be_non_negative() {
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(100).is_ok());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn update_skips_unsupplied_fields() {
        assert!(validate_sweet_update(&SweetUpdate::default()).is_ok());

        let bad_price = SweetUpdate {
            price: Some(-2.0),
            ..Default::default()
        };
        assert!(validate_sweet_update(&bad_price).is_err());

        let only_name = SweetUpdate {
            name: Some("Gems".into()),
            ..Default::default()
        };
        assert!(validate_sweet_update(&only_name).is_ok());
    }
}
