//! # Address Builder
//!
//! Validates and sanitizes a shipping/billing address tuple into a canonical
//! [`Address`] record.
//!
//! ## Check Ordering
//! ```text
//! raw fields ──► presence check ──► country-specific format check ──► sanitize
//!                (Required)          (German postal code)             (last)
//! ```
//!
//! Presence is checked on the raw values before sanitization, and the postal
//! format before sanitization as well, so error messages reflect the most
//! specific available problem.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::sanitize::sanitize_input;

// =============================================================================
// Address
// =============================================================================

/// A canonical, sanitized postal address.
///
/// Invariant: no field is empty; every field has passed through
/// [`sanitize_input`]. Construct through [`create_sanitized_address`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Address {
    pub name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

// =============================================================================
// Builder
// =============================================================================

/// Builds a sanitized [`Address`] from raw form fields.
///
/// ## Rules
/// - Every field must be non-empty (checked before sanitization)
/// - If `country` contains "germany" (case-insensitive), the postal code
///   must be exactly 5 ASCII digits
/// - All fields pass through [`sanitize_input`] last
///
/// ## Example
/// ```rust
/// use apotheca_core::address::create_sanitized_address;
///
/// let address = create_sanitized_address(
///     "  John <script>Doe</script>  ",
///     "<b>123</b> Main St",
///     "New York",
///     "10001",
///     "USA",
/// )
/// .unwrap();
///
/// assert_eq!(address.name, "John Doe");
/// assert_eq!(address.street, "123 Main St");
/// ```
pub fn create_sanitized_address(
    name: &str,
    street: &str,
    city: &str,
    postal_code: &str,
    country: &str,
) -> Result<Address, ValidationError> {
    require("name", name)?;
    require("street", street)?;
    require("city", city)?;
    require("postalCode", postal_code)?;
    require("country", country)?;

    if country.to_lowercase().contains("germany") && !is_german_postal_code(postal_code) {
        return Err(ValidationError::InvalidFormat {
            field: "postalCode".to_string(),
            reason: "must be exactly 5 digits".to_string(),
        });
    }

    Ok(Address {
        name: sanitize_input(name),
        street: sanitize_input(street),
        city: sanitize_input(city),
        postal_code: sanitize_input(postal_code),
        country: sanitize_input(country),
    })
}

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn is_german_postal_code(postal_code: &str) -> bool {
    postal_code.len() == 5 && postal_code.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_sanitized_address() {
        let address = create_sanitized_address(
            "  John <script>Doe</script>  ",
            "<b>123</b> Main St",
            "New York",
            "10001",
            "USA",
        )
        .unwrap();

        assert_eq!(
            address,
            Address {
                name: "John Doe".to_string(),
                street: "123 Main St".to_string(),
                city: "New York".to_string(),
                postal_code: "10001".to_string(),
                country: "USA".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_field_is_required_error() {
        let err = create_sanitized_address("", "Hauptstr. 1", "Berlin", "10115", "Germany")
            .unwrap_err();
        assert!(matches!(err, ValidationError::Required { ref field } if field == "name"));

        let err = create_sanitized_address("Adler Apotheke", "Hauptstr. 1", "Berlin", "", "Germany")
            .unwrap_err();
        assert!(matches!(err, ValidationError::Required { ref field } if field == "postalCode"));
    }

    #[test]
    fn test_german_postal_code_must_be_five_digits() {
        let err = create_sanitized_address("Adler Apotheke", "Hauptstr. 1", "Berlin", "1011", "Germany")
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "postalCode"));

        let err = create_sanitized_address("Adler Apotheke", "Hauptstr. 1", "Berlin", "1O115", "GERMANY")
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));

        assert!(
            create_sanitized_address("Adler Apotheke", "Hauptstr. 1", "Berlin", "10115", "germany")
                .is_ok()
        );
    }

    #[test]
    fn test_non_german_postal_codes_are_free_form() {
        let address =
            create_sanitized_address("ACME", "1 Infinite Loop", "Cupertino", "CA 95014", "USA")
                .unwrap();
        assert_eq!(address.postal_code, "CA 95014");
    }

    #[test]
    fn test_presence_beats_format() {
        // An empty postal code in Germany reports Required, not InvalidFormat
        let err = create_sanitized_address("Adler Apotheke", "Hauptstr. 1", "Berlin", "", "Germany")
            .unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));
    }
}
