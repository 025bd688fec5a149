//! # Validation Module
//!
//! Business rule validation for structured input.
//!
//! ## Two Input Regimes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Free-text fields (quantity box, tender box)                        │
//! │  └── pdv_core::parse - malformed text coerces to zero, NEVER errors │
//! │                                                                     │
//! │  Structured input (barcodes, ids, already-parsed numbers)           │
//! │  └── THIS MODULE - typed ValidationError on violation               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//! The split matters: a cashier typo must not block the sale, but a
//! malformed barcode or an out-of-range parsed quantity is a real fault.

use crate::error::ValidationError;
use crate::{MAX_LINE_QUANTITY, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a barcode before it is sent to the lookup endpoint.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 50 characters
/// - Alphanumeric plus hyphens (EAN/UPC digits and internal codes)
///
/// ## Returns
/// The trimmed barcode.
///
/// ## Example
/// ```rust
/// use pdv_core::validation::validate_barcode;
///
/// assert_eq!(validate_barcode(" 7891000100103 ").unwrap(), "7891000100103");
/// assert!(validate_barcode("").is_err());
/// assert!(validate_barcode("no spaces here!").is_err());
/// ```
pub fn validate_barcode(barcode: &str) -> ValidationResult<String> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }
    if barcode.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 50,
        });
    }
    if !barcode.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only letters, numbers and hyphens".to_string(),
        });
    }

    Ok(barcode.to_string())
}

/// Validates an already-parsed quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a unit price in centavos.
///
/// ## Rules
/// - Must be non-negative; zero is allowed (giveaway items)
/// - Must not exceed MAX_UNIT_PRICE_CENTS — amounts beyond that are
///   garbage from the lookup boundary, not real prices
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 || cents > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
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
    fn test_validate_barcode() {
        assert!(validate_barcode("7891000100103").is_ok());
        assert!(validate_barcode("ABC-123").is_ok());

        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("   ").is_err());
        assert!(validate_barcode("has space").is_err());
        assert!(validate_barcode(&"9".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(MAX_UNIT_PRICE_CENTS).is_ok());

        assert!(validate_price_cents(-100).is_err());
        assert!(validate_price_cents(MAX_UNIT_PRICE_CENTS + 1).is_err());
    }
}
