//! # Validation Module
//!
//! Input validation for ledger operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                 │
//! │  └── Immediate feedback only, never trusted                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (called by the Ledger before any write)          │
//! │  ├── Identifier format, name length                                    │
//! │  ├── Price and quantity in range                                       │
//! │  └── Sale batch shape                                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite constraints                                           │
//! │  ├── PRIMARY KEY / UNIQUE                                              │
//! │  └── FOREIGN KEY                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rx_core::validation::{validate_product_id, validate_quantity};
//!
//! assert!(validate_product_id("AMOX-500").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::SaleItemInput;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS, MAX_PURCHASE_QUANTITY, MAX_SALE_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates an identifier: non-empty, at most 50 characters, letters,
/// digits, hyphens and underscores only.
fn validate_identifier(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 50 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 50,
        });
    }

    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product ID.
///
/// ## Example
/// ```rust
/// use rx_core::validation::validate_product_id;
///
/// assert!(validate_product_id("17").is_ok());
/// assert!(validate_product_id("").is_err());
/// assert!(validate_product_id("has space").is_err());
/// ```
pub fn validate_product_id(product_id: &str) -> ValidationResult<()> {
    validate_identifier("productId", product_id)
}

/// Validates a supplier ID.
pub fn validate_supplier_id(supp_id: &str) -> ValidationResult<()> {
    validate_identifier("suppId", supp_id)
}

/// Validates a sale (invoice) ID.
///
/// Only presence and length are checked: invoice numbers come from the
/// counter and may contain slashes or spaces.
pub fn validate_sale_id(sale_id: &str) -> ValidationResult<()> {
    let sale_id = sale_id.trim();

    if sale_id.is_empty() {
        return Err(ValidationError::Required {
            field: "saleId".to_string(),
        });
    }

    if sale_id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "saleId".to_string(),
            max: 64,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (product or supplier): 1-200 characters.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a username: 3-50 characters, same alphabet as identifiers.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    validate_identifier("username", username)?;

    if username.trim().len() < 3 {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must be at least 3 characters".to_string(),
        });
    }

    Ok(())
}

/// Validates a password: at least 8 characters.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < 8 {
        return Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: "must be at least 8 characters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale price: 0..=MAX_PRICE_CENTS. Zero is allowed (free samples).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "salePrice".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a sale line quantity: 1..=MAX_ITEM_QUANTITY.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a purchase quantity: 1..=MAX_PURCHASE_QUANTITY.
pub fn validate_purchase_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_PURCHASE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_PURCHASE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Batch Validators
// =============================================================================

/// Validates a whole sale batch before anything is written.
///
/// ## Rules
/// - sale ID present
/// - 1..=MAX_SALE_ITEMS items
/// - every product ID well-formed, every quantity in range
pub fn validate_sale(sale_id: &str, items: &[SaleItemInput]) -> ValidationResult<()> {
    validate_sale_id(sale_id)?;

    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if items.len() > MAX_SALE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SALE_ITEMS as i64,
        });
    }

    for item in items {
        validate_product_id(&item.product_id)?;
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
