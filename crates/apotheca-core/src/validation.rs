//! # Checkout Field Validation
//!
//! Boolean gates over the untrusted JSON payload the checkout screen
//! submits.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront (TypeScript)                                      │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - gates over raw JSON                            │
//! │  ├── Shape checks (array, string, number)                              │
//! │  └── Business gates (non-empty cart, verified pharmacist)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Hard construction (checkout/address modules)                 │
//! │  └── Typed errors abort order assembly                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every gate returns a plain boolean and never panics: malformed input is a
//! `false`, not an error. The caller is responsible for the user-facing
//! message and for not proceeding.

use serde_json::Value;

use crate::sanitize::sanitize_input;
use crate::types::PaymentMethod;

/// The eight address fields the checkout form must fill.
const REQUIRED_FORM_FIELDS: [&str; 8] = [
    "shippingName",
    "shippingStreet",
    "shippingCity",
    "shippingPostalCode",
    "billingName",
    "billingStreet",
    "billingCity",
    "billingPostalCode",
];

// =============================================================================
// Cart Gate
// =============================================================================

/// Checks that the submitted cart is a non-empty array of well-formed line
/// items.
///
/// ## Rules
/// - Input must be a JSON array with at least one element
/// - Every element must carry a string `productId`
/// - Every element must carry a numeric `quantity` greater than zero
///
/// ## Example
/// ```rust
/// use apotheca_core::validation::validate_cart_has_products;
/// use serde_json::json;
///
/// assert!(validate_cart_has_products(&json!([
///     { "productId": "p-1", "quantity": 2 }
/// ])));
/// assert!(!validate_cart_has_products(&json!([])));
/// assert!(!validate_cart_has_products(&json!(null)));
/// ```
pub fn validate_cart_has_products(items: &Value) -> bool {
    let Some(array) = items.as_array() else {
        return false;
    };
    if array.is_empty() {
        return false;
    }

    array.iter().all(|item| {
        let id_ok = item.get("productId").is_some_and(Value::is_string);
        let quantity_ok = item
            .get("quantity")
            .and_then(Value::as_f64)
            .is_some_and(|q| q > 0.0);
        id_ok && quantity_ok
    })
}

// =============================================================================
// Form Gate
// =============================================================================

/// Checks that every required checkout form field survives sanitization and
/// that the payment method, when supplied, is a known one.
///
/// ## Rules
/// - All eight shipping/billing fields must be strings that are non-empty
///   *after* [`sanitize_input`] (a field of only tags or whitespace fails)
/// - An absent, null, or empty `paymentMethod` passes; the typed form state
///   defaults it to `invoice` downstream
/// - A present non-empty `paymentMethod` must parse as a [`PaymentMethod`]
pub fn validate_order_form_fields(form: &Value) -> bool {
    let Some(object) = form.as_object() else {
        return false;
    };

    for field in REQUIRED_FORM_FIELDS {
        match object.get(field).and_then(Value::as_str) {
            Some(value) if !sanitize_input(value).is_empty() => {}
            _ => return false,
        }
    }

    match object.get("paymentMethod") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) if s.is_empty() => true,
        Some(value) => value
            .as_str()
            .is_some_and(|method| PaymentMethod::parse(method).is_some()),
    }
}

// =============================================================================
// Eligibility Gate
// =============================================================================

/// Business rule: only verified pharmacists may purchase.
///
/// ## Example
/// ```rust
/// use apotheca_core::validation::validate_user_can_checkout;
///
/// assert!(validate_user_can_checkout(true, true));
/// assert!(!validate_user_can_checkout(true, false));
/// assert!(!validate_user_can_checkout(false, true));
/// ```
#[inline]
pub const fn validate_user_can_checkout(is_pharmacist: bool, is_verified: bool) -> bool {
    is_pharmacist && is_verified
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled_form() -> Value {
        json!({
            "shippingName": "Adler Apotheke",
            "shippingStreet": "Hauptstr. 1",
            "shippingCity": "Berlin",
            "shippingPostalCode": "10115",
            "billingName": "Adler Apotheke",
            "billingStreet": "Hauptstr. 1",
            "billingCity": "Berlin",
            "billingPostalCode": "10115",
        })
    }

    #[test]
    fn test_cart_gate_accepts_well_formed_items() {
        let cart = json!([
            { "productId": "p-1", "quantity": 2 },
            { "productId": "p-2", "quantity": 1.0 },
        ]);
        assert!(validate_cart_has_products(&cart));
    }

    #[test]
    fn test_cart_gate_rejects_shape_violations() {
        assert!(!validate_cart_has_products(&json!([])));
        assert!(!validate_cart_has_products(&json!(null)));
        assert!(!validate_cart_has_products(&json!("cart")));
        assert!(!validate_cart_has_products(&json!([{ "productId": "1", "quantity": -1 }])));
        assert!(!validate_cart_has_products(&json!([{ "productId": "1", "quantity": 0 }])));
        assert!(!validate_cart_has_products(&json!([{ "productId": 7, "quantity": 1 }])));
        assert!(!validate_cart_has_products(&json!([{ "quantity": 1 }])));
        assert!(!validate_cart_has_products(&json!([{ "productId": "1", "quantity": "2" }])));
    }

    #[test]
    fn test_cart_gate_one_bad_item_fails_all() {
        let cart = json!([
            { "productId": "p-1", "quantity": 2 },
            { "productId": "p-2" },
        ]);
        assert!(!validate_cart_has_products(&cart));
    }

    #[test]
    fn test_form_gate_accepts_filled_form_without_payment_method() {
        assert!(validate_order_form_fields(&filled_form()));
    }

    #[test]
    fn test_form_gate_rejects_any_empty_required_field() {
        for field in REQUIRED_FORM_FIELDS {
            let mut form = filled_form();
            form[field] = json!("");
            assert!(!validate_order_form_fields(&form), "{field} empty must fail");

            let mut form = filled_form();
            form.as_object_mut().unwrap().remove(field);
            assert!(!validate_order_form_fields(&form), "{field} missing must fail");
        }
    }

    #[test]
    fn test_form_gate_field_empty_after_sanitization_fails() {
        let mut form = filled_form();
        form["shippingName"] = json!("  <b></b>  ");
        assert!(!validate_order_form_fields(&form));
    }

    #[test]
    fn test_form_gate_payment_methods() {
        for method in ["invoice", "bank_transfer", "credit_card"] {
            let mut form = filled_form();
            form["paymentMethod"] = json!(method);
            assert!(validate_order_form_fields(&form), "{method} must pass");
        }

        let mut form = filled_form();
        form["paymentMethod"] = json!("invalid_method");
        assert!(!validate_order_form_fields(&form));

        // Absent, null, and empty all fall back to the invoice default
        let mut form = filled_form();
        form["paymentMethod"] = json!(null);
        assert!(validate_order_form_fields(&form));
        form["paymentMethod"] = json!("");
        assert!(validate_order_form_fields(&form));
    }

    #[test]
    fn test_form_gate_rejects_non_object() {
        assert!(!validate_order_form_fields(&json!(null)));
        assert!(!validate_order_form_fields(&json!([1, 2])));
    }

    #[test]
    fn test_eligibility_gate_is_pure_and() {
        assert!(validate_user_can_checkout(true, true));
        assert!(!validate_user_can_checkout(true, false));
        assert!(!validate_user_can_checkout(false, true));
        assert!(!validate_user_can_checkout(false, false));
    }
}
