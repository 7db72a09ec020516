//! # Checkout Assembly
//!
//! Order item normalization, cart totalling, and assembly of the final
//! [`Order`] payload.
//!
//! ## Checkout Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Pipeline                                   │
//! │                                                                         │
//! │  enriched cart + form + shopper                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  empty cart? ──────────────► Err(EmptyCart)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  verified pharmacist? ─────► Err(NotEligible)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  prepare_order_items ──────► Err(MissingProductData)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  calculate_subtotal / calculate_vat                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  create_sanitized_address ─► Err(Validation)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  generate_order_number + UUID + timestamp                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Order { status: Pending } ──► persistence collaborator                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here persists anything; a hard error leaves no partial state.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::address::create_sanitized_address;
use crate::error::{CheckoutError, CheckoutResult};
use crate::money::Money;
use crate::order_number::{generate_order_number, RandomSource};
use crate::sanitize::sanitize_input;
use crate::types::{EnrichedCartItem, Order, OrderFormState, OrderLineSnapshot, OrderStatus, Shopper};
use crate::validation::validate_user_can_checkout;
use crate::{FALLBACK_PRODUCT_NAME, GERMAN_VAT};

// =============================================================================
// Price/Tax Calculator
// =============================================================================

/// Sums `price × quantity` over items whose product lookup succeeded.
///
/// Items with a missing product are skipped and contribute zero; this is a
/// display-path total and must never abort. Empty input yields zero.
///
/// ## Example
/// ```rust
/// use apotheca_core::checkout::calculate_subtotal;
/// use apotheca_core::money::Money;
///
/// assert_eq!(calculate_subtotal(&[]), Money::zero());
/// ```
pub fn calculate_subtotal(items: &[EnrichedCartItem]) -> Money {
    items
        .iter()
        .filter_map(|item| {
            item.product
                .as_ref()
                .map(|product| product.price().multiply_quantity(item.quantity))
        })
        .fold(Money::zero(), |acc, line| acc + line)
}

/// Applies the fixed 19% German VAT to a subtotal.
///
/// Not configurable and not looked up per jurisdiction.
#[inline]
pub fn calculate_vat(subtotal: Money) -> Money {
    subtotal.calculate_tax(GERMAN_VAT)
}

// =============================================================================
// Order Item Normalizer
// =============================================================================

/// Maps enriched cart items into frozen order-line snapshots.
///
/// Unlike [`calculate_subtotal`], a missing product here is a hard error for
/// the *whole* batch: an order must never be placed against product data the
/// catalog no longer confirms. The error message asks the shopper to reload.
///
/// An empty catalog name falls back to [`FALLBACK_PRODUCT_NAME`].
pub fn prepare_order_items(items: &[EnrichedCartItem]) -> CheckoutResult<Vec<OrderLineSnapshot>> {
    items
        .iter()
        .map(|item| {
            let product =
                item.product
                    .as_ref()
                    .ok_or_else(|| CheckoutError::MissingProductData {
                        product_id: item.product_id.clone(),
                    })?;

            let name = if product.name.is_empty() {
                FALLBACK_PRODUCT_NAME.to_string()
            } else {
                product.name.clone()
            };

            Ok(OrderLineSnapshot {
                product_id: product.id.clone(),
                name,
                quantity: item.quantity,
                price_cents: product.price_cents,
            })
        })
        .collect()
}

// =============================================================================
// Order Assembly
// =============================================================================

/// Assembles the complete order payload for the persistence collaborator.
///
/// Pure given its inputs: the timestamp and random source are injected so
/// tests can pin them. See the module docs for the pipeline ordering.
///
/// ## Errors
/// - [`CheckoutError::EmptyCart`] when no items were submitted
/// - [`CheckoutError::NotEligible`] unless the shopper is a verified pharmacist
/// - [`CheckoutError::MissingProductData`] from item normalization
/// - [`CheckoutError::Validation`] from address construction
pub fn assemble_order(
    items: &[EnrichedCartItem],
    form: &OrderFormState,
    shopper: &Shopper,
    created_at: DateTime<Utc>,
    random: &mut dyn RandomSource,
) -> CheckoutResult<Order> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    if !validate_user_can_checkout(shopper.is_pharmacist, shopper.is_verified) {
        return Err(CheckoutError::NotEligible);
    }

    let line_items = prepare_order_items(items)?;

    let subtotal = calculate_subtotal(items);
    let vat = calculate_vat(subtotal);
    let total = subtotal + vat;

    let shipping_address = create_sanitized_address(
        &form.shipping_name,
        &form.shipping_street,
        &form.shipping_city,
        &form.shipping_postal_code,
        &form.shipping_country,
    )?;
    let billing_address = create_sanitized_address(
        &form.billing_name,
        &form.billing_street,
        &form.billing_city,
        &form.billing_postal_code,
        &form.billing_country,
    )?;

    let notes = {
        let sanitized = sanitize_input(&form.notes);
        if sanitized.is_empty() {
            None
        } else {
            Some(sanitized)
        }
    };

    let order_number =
        generate_order_number(&shopper.user_id, created_at.timestamp_millis(), random);

    Ok(Order {
        id: Uuid::new_v4().to_string(),
        order_number,
        user_id: shopper.user_id.clone(),
        items: line_items,
        subtotal_cents: subtotal.cents(),
        vat_cents: vat.cents(),
        total_cents: total.cents(),
        shipping_address,
        billing_address,
        payment_method: form.payment_method,
        notes,
        status: OrderStatus::Pending,
        created_at,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
