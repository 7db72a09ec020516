//! # apotheca-core: Pure Checkout Logic for the Apotheca Pharmacy Portal
//!
//! This crate is the **heart** of the Apotheca wholesale portal. It contains
//! the checkout business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Apotheca Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront (TypeScript, external)               │   │
//! │  │    Catalog UI ──► Cart UI ──► Checkout Form ──► Order History  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ apotheca-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐ │   │
//! │  │   │  types   │ │  money   │ │ sanitize │ │    validation    │ │   │
//! │  │   │ Product  │ │  Money   │ │  input   │ │  cart / form /   │ │   │
//! │  │   │  Order   │ │ TaxRate  │ │  filter  │ │   eligibility    │ │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘ │   │
//! │  │   ┌──────────┐ ┌──────────────┐ ┌──────────────────────────┐  │   │
//! │  │   │ address  │ │ order_number │ │        checkout          │  │   │
//! │  │   │ builder  │ │  generator   │ │  normalize + assemble    │  │   │
//! │  │   └──────────┘ └──────────────┘ └──────────────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 apotheca-db (persistence layer)                 │   │
//! │  │          SQLite queries, migrations, repositories               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, OrderFormState, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`sanitize`] - One-way input sanitization policies
//! - [`address`] - Validated, sanitized address construction
//! - [`order_number`] - Human-traceable order number generation
//! - [`validation`] - Checkout field gates over untrusted JSON
//! - [`checkout`] - Order item normalization, totals, order assembly
//! - [`kv`] - Injected key-value storage capability (form drafts)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic given its inputs;
//!    randomness and storage enter only through injected capabilities
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are euro cents (i64)
//! 4. **Explicit Errors**: hard failures are typed enums, soft failures are
//!    plain booleans; nothing panics on user input
//!
//! ## Example Usage
//!
//! ```rust
//! use apotheca_core::money::Money;
//! use apotheca_core::checkout::calculate_vat;
//!
//! // Create money from cents (never from floats!)
//! let subtotal = Money::from_cents(4000); // 40.00 €
//!
//! // German VAT is a fixed 19%
//! let vat = calculate_vat(subtotal);
//! assert_eq!(vat.cents(), 760); // 7.60 €
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod address;
pub mod checkout;
pub mod error;
pub mod kv;
pub mod money;
pub mod order_number;
pub mod sanitize;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use apotheca_core::Money` instead of
// `use apotheca_core::money::Money`

pub use address::Address;
pub use error::{CheckoutError, CheckoutResult, ValidationError};
pub use money::Money;
pub use types::*;

use types::TaxRate;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fixed German VAT rate (19%) applied to every order.
///
/// The portal sells into a single jurisdiction; there is no per-product or
/// per-country rate lookup.
pub const GERMAN_VAT: TaxRate = TaxRate::from_bps(1900);

/// Maximum length of a sanitized free-text field (addresses, notes).
pub const MAX_INPUT_LENGTH: usize = 255;

/// Maximum length of a sanitized search/category filter.
pub const MAX_FILTER_LENGTH: usize = 500;

/// Placeholder used when a catalog product carries an empty name at order
/// time. Shown on order documents as-is.
pub const FALLBACK_PRODUCT_NAME: &str = "Unbekanntes Produkt";
