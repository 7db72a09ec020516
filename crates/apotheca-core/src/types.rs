//! # Domain Types
//!
//! Core domain types used throughout the Apotheca portal.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌───────────────────┐    │
//! │  │    Product      │   │  CartLineItem    │   │ EnrichedCartItem  │    │
//! │  │  ─────────────  │   │  ──────────────  │   │  ───────────────  │    │
//! │  │  id (UUID)      │   │  product_id      │   │  product_id       │    │
//! │  │  name           │──►│  quantity        │──►│  quantity         │    │
//! │  │  price_cents    │   │                  │   │  product: Option  │    │
//! │  │  stock          │   │ (cart owns this) │   │ (transient join)  │    │
//! │  └─────────────────┘   └──────────────────┘   └─────────┬─────────┘    │
//! │                                                          │              │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────▼─────────┐    │
//! │  │ OrderFormState  │   │      Order       │◄──│ OrderLineSnapshot │    │
//! │  │  shipping/bill  │──►│  number, totals  │   │  frozen identity  │    │
//! │  │  method, notes  │   │  addresses, ...  │   │  and price        │    │
//! │  └─────────────────┘   └──────────────────┘   └───────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The snapshot pattern decouples an order from later catalog changes: once
//! an order exists, renaming or repricing a product does not rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::address::Address;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000; 1900 bps = 19% (German standard VAT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product, read-only to the checkout core.
///
/// Supplied by the product-catalog collaborator; the core never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the catalog and on order documents.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Price in euro cents.
    pub price_cents: i64,

    /// Current stock level in sale units.
    pub stock: i64,

    /// Whether the product is currently listed (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Cart Line Items
// =============================================================================

/// A line item as the cart collaborator stores it.
///
/// The cart owns these; checkout only references them. Quantity is kept
/// positive by the cart's own add/update rules.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    /// Product ID (UUID).
    pub product_id: String,

    /// Quantity in the cart, always > 0.
    pub quantity: i64,
}

impl CartLineItem {
    /// Joins this line item with the result of a catalog lookup.
    ///
    /// A failed lookup is represented as `None` and carried along; the
    /// calculator and the normalizer react to it differently.
    pub fn enrich(&self, product: Option<Product>) -> EnrichedCartItem {
        EnrichedCartItem {
            product_id: self.product_id.clone(),
            quantity: self.quantity,
            product,
        }
    }
}

/// A cart line item joined with its catalog product.
///
/// Transient: exists only for the duration of a checkout calculation.
/// `product` is absent when the catalog lookup failed (deleted or delisted
/// product still sitting in a stale cart).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EnrichedCartItem {
    pub product_id: String,
    pub quantity: i64,
    pub product: Option<Product>,
}

// =============================================================================
// Order Line Snapshot
// =============================================================================

/// An immutable copy of product identity and price at order time.
///
/// Never constructed when the source product is absent; order item
/// normalization fails the whole batch instead.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLineSnapshot {
    pub product_id: String,

    /// Product name at order time (frozen).
    pub name: String,

    /// Quantity ordered.
    pub quantity: i64,

    /// Unit price in cents at order time (frozen).
    pub price_cents: i64,
}

impl OrderLineSnapshot {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a wholesale order is settled.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Payment on invoice (the wholesale default).
    #[default]
    Invoice,
    /// Prepayment by bank transfer.
    BankTransfer,
    /// Card payment.
    CreditCard,
}

impl PaymentMethod {
    /// The wire form used by the storefront and the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Invoice => "invoice",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::CreditCard => "credit_card",
        }
    }

    /// Parses the wire form; unknown strings yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "invoice" => Some(PaymentMethod::Invoice),
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            "credit_card" => Some(PaymentMethod::CreditCard),
            _ => None,
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The fulfilment status of an order.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Submitted, awaiting back-office confirmation.
    #[default]
    Pending,
    /// Confirmed and being picked.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Confirmed received.
    Delivered,
    /// Cancelled before shipment.
    Cancelled,
}

// =============================================================================
// Order Form State
// =============================================================================

/// The full checkout form as the storefront edits it.
///
/// Created with defaults (both countries "Germany", payment on invoice),
/// mutated field-by-field by user input, consumed once at submission.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderFormState {
    pub shipping_name: String,
    pub shipping_street: String,
    pub shipping_city: String,
    pub shipping_postal_code: String,
    pub shipping_country: String,

    pub billing_name: String,
    pub billing_street: String,
    pub billing_city: String,
    pub billing_postal_code: String,
    pub billing_country: String,

    pub payment_method: PaymentMethod,

    /// Free-text notes for the back office, sanitized at submission.
    pub notes: String,
}

impl Default for OrderFormState {
    fn default() -> Self {
        OrderFormState {
            shipping_name: String::new(),
            shipping_street: String::new(),
            shipping_city: String::new(),
            shipping_postal_code: String::new(),
            shipping_country: "Germany".to_string(),
            billing_name: String::new(),
            billing_street: String::new(),
            billing_city: String::new(),
            billing_postal_code: String::new(),
            billing_country: "Germany".to_string(),
            payment_method: PaymentMethod::Invoice,
            notes: String::new(),
        }
    }
}

impl OrderFormState {
    /// Mirrors the shipping address into the billing fields.
    ///
    /// Bound to the "billing same as shipping" action in the checkout form.
    pub fn copy_shipping_to_billing(&mut self) {
        self.billing_name = self.shipping_name.clone();
        self.billing_street = self.shipping_street.clone();
        self.billing_city = self.shipping_city.clone();
        self.billing_postal_code = self.shipping_postal_code.clone();
        self.billing_country = self.shipping_country.clone();
    }
}

// =============================================================================
// Shopper
// =============================================================================

/// The authenticated account attempting checkout.
///
/// Role and verification flags come from the auth collaborator; the core
/// only gates on them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Shopper {
    pub user_id: String,
    pub is_pharmacist: bool,
    pub is_verified: bool,
}

// =============================================================================
// Order
// =============================================================================

/// A fully assembled order, ready for the persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-traceable order number (`RX-…`). Uniqueness is enforced by the
    /// persistence layer, not by the generator.
    pub order_number: String,

    /// The shopper who placed the order.
    pub user_id: String,

    /// Frozen line items.
    pub items: Vec<OrderLineSnapshot>,

    pub subtotal_cents: i64,
    pub vat_cents: i64,
    pub total_cents: i64,

    pub shipping_address: Address,
    pub billing_address: Address,

    pub payment_method: PaymentMethod,

    /// Sanitized free-text notes, if any were entered.
    pub notes: Option<String>,

    pub status: OrderStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1900);
        assert_eq!(rate.bps(), 1900);
        assert!((rate.percentage() - 19.0).abs() < 0.001);
    }

    #[test]
    fn test_payment_method_round_trip() {
        for method in [
            PaymentMethod::Invoice,
            PaymentMethod::BankTransfer,
            PaymentMethod::CreditCard,
        ] {
            assert_eq!(PaymentMethod::parse(method.as_str()), Some(method));
        }
        assert_eq!(PaymentMethod::parse("invalid_method"), None);
    }

    #[test]
    fn test_payment_method_default_is_invoice() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Invoice);
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_form_defaults() {
        let form = OrderFormState::default();
        assert_eq!(form.shipping_country, "Germany");
        assert_eq!(form.billing_country, "Germany");
        assert_eq!(form.payment_method, PaymentMethod::Invoice);
        assert!(form.shipping_name.is_empty());
    }

    #[test]
    fn test_copy_shipping_to_billing() {
        let mut form = OrderFormState {
            shipping_name: "Adler Apotheke".to_string(),
            shipping_street: "Hauptstr. 1".to_string(),
            shipping_city: "Berlin".to_string(),
            shipping_postal_code: "10115".to_string(),
            ..OrderFormState::default()
        };

        form.copy_shipping_to_billing();

        assert_eq!(form.billing_name, "Adler Apotheke");
        assert_eq!(form.billing_street, "Hauptstr. 1");
        assert_eq!(form.billing_city, "Berlin");
        assert_eq!(form.billing_postal_code, "10115");
        assert_eq!(form.billing_country, "Germany");
    }

    #[test]
    fn test_line_snapshot_total() {
        let line = OrderLineSnapshot {
            product_id: "p-1".to_string(),
            name: "Cannabisblüten 20/1".to_string(),
            quantity: 3,
            price_cents: 1250,
        };
        assert_eq!(line.line_total().cents(), 3750);
    }
}
