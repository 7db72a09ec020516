//! # Error Types
//!
//! Domain-specific error types for apotheca-core.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Taxonomy                                  │
//! │                                                                         │
//! │  Soft validation failures (validation module)                          │
//! │  └── plain `false` returns - caller shows a message, nothing aborts    │
//! │                                                                         │
//! │  Hard construction failures (this file)                                │
//! │  ├── CheckoutError     - aborts order assembly entirely                │
//! │  └── ValidationError   - field-level address/form failures             │
//! │                                                                         │
//! │  apotheca-db errors (separate crate)                                   │
//! │  └── DbError           - persistence failures                          │
//! │                                                                         │
//! │  Flow: ValidationError → CheckoutError → caller → storefront message   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing has been persisted when a hard failure occurs, so there is no
//! partial order state to roll back.

use thiserror::Error;

// =============================================================================
// Checkout Error
// =============================================================================

/// Hard failures during order assembly.
///
/// Any of these aborts the in-progress checkout pipeline; the storefront
/// renders the message and the shopper starts over.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A cart line item arrived without its catalog product.
    ///
    /// The message is the exact user-facing German string the storefront
    /// displays; the shopper is asked to reload so the cart re-joins against
    /// the current catalog.
    #[error("Produktdaten fehlen. Bitte laden Sie die Seite neu.")]
    MissingProductData { product_id: String },

    /// Checkout was submitted with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The shopper is not a verified pharmacist.
    ///
    /// Only accounts with both the pharmacist role and a completed
    /// verification may place orders.
    #[error("Only verified pharmacists may place orders")]
    NotEligible,

    /// Field-level failure while building an address (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation errors.
///
/// Raised while constructing a sanitized address; the field name identifies
/// the most specific problem found.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g., a German postal code that is not 5 digits).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CheckoutError.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_product_message_is_verbatim() {
        let err = CheckoutError::MissingProductData {
            product_id: "p-1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Produktdaten fehlen. Bitte laden Sie die Seite neu."
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "street".to_string(),
        };
        assert_eq!(err.to_string(), "street is required");

        let err = ValidationError::InvalidFormat {
            field: "postalCode".to_string(),
            reason: "must be exactly 5 digits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "postalCode has invalid format: must be exactly 5 digits"
        );
    }

    #[test]
    fn test_validation_converts_to_checkout_error() {
        let validation_err = ValidationError::Required {
            field: "city".to_string(),
        };
        let checkout_err: CheckoutError = validation_err.into();
        assert!(matches!(checkout_err, CheckoutError::Validation(_)));
    }
}
