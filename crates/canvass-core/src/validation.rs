//! # Validation Module
//!
//! Input validation for sale submissions and workflow decisions.
//!
//! Validation runs before any business logic: a failure here means
//! nothing was persisted and no notification fired.

use crate::error::ValidationError;
use crate::{MAX_PRODUCT_QUANTITY, MAX_SALE_PRODUCTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer address.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 500 characters
///
/// ## Returns
/// The trimmed address.
pub fn validate_customer_address(address: &str) -> ValidationResult<String> {
    let address = address.trim();

    if address.is_empty() {
        return Err(ValidationError::required("customer_address"));
    }

    if address.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "customer_address".to_string(),
            max: 500,
        });
    }

    Ok(address.to_string())
}

/// Validates a rejection reason.
///
/// A rejected decision requires a non-empty reason; silent rejects are
/// not accepted by the workflow.
pub fn validate_rejection_reason(reason: Option<&str>) -> ValidationResult<String> {
    let reason = reason.unwrap_or("").trim();

    if reason.is_empty() {
        return Err(ValidationError::required("rejection_reason"));
    }

    if reason.len() > 1000 {
        return Err(ValidationError::TooLong {
            field: "rejection_reason".to_string(),
            max: 1000,
        });
    }

    Ok(reason.to_string())
}

// =============================================================================
// Numeric / Collection Validators
// =============================================================================

/// Validates a line-item quantity.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_PRODUCT_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_PRODUCT_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the product list shape (non-empty, bounded).
pub fn validate_product_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::empty("products"));
    }

    if count > MAX_SALE_PRODUCTS {
        return Err(ValidationError::OutOfRange {
            field: "products".to_string(),
            min: 1,
            max: MAX_SALE_PRODUCTS as i64,
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
    fn test_validate_customer_address() {
        assert_eq!(
            validate_customer_address("  12 Elm St, Austin TX ").unwrap(),
            "12 Elm St, Austin TX"
        );

        assert!(validate_customer_address("").is_err());
        assert!(validate_customer_address("   ").is_err());
        assert!(validate_customer_address(&"a".repeat(600)).is_err());
    }

    #[test]
    fn test_validate_rejection_reason() {
        assert_eq!(
            validate_rejection_reason(Some("duplicate entry")).unwrap(),
            "duplicate entry"
        );

        assert!(validate_rejection_reason(None).is_err());
        assert!(validate_rejection_reason(Some("")).is_err());
        assert!(validate_rejection_reason(Some("   ")).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_PRODUCT_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_PRODUCT_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_product_count() {
        assert!(validate_product_count(1).is_ok());
        assert!(validate_product_count(MAX_SALE_PRODUCTS).is_ok());

        assert!(validate_product_count(0).is_err());
        assert!(validate_product_count(MAX_SALE_PRODUCTS + 1).is_err());
    }
}
