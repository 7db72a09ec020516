//! # Order Number Generator
//!
//! Produces human-traceable, collision-resistant order identifiers.
//!
//! ## Format
//! ```text
//! RX-user-600000-b1f0
//! │  │    │      └── 4 hex chars (one low nibble per random byte)
//! │  │    └── last 6 digits of the epoch-millis timestamp, zero-padded
//! │  └── first 4 chars of the user id (shorter ids are not padded)
//! └── fixed prefix
//! ```
//!
//! The prefix is deterministic (traceable to user and approximate time), the
//! suffix random (collision resistance). The generator never checks for
//! collisions; callers needing strict uniqueness enforce it at the
//! persistence layer (`orders.order_number` is UNIQUE).

use rand::RngCore;

// =============================================================================
// Random Source Capability
// =============================================================================

/// Injected source of random bytes.
///
/// Production uses [`OsRandom`]; tests inject a fixed-byte fake for
/// deterministic output.
pub trait RandomSource {
    /// Fills `dest` with random bytes.
    fn fill_bytes(&mut self, dest: &mut [u8]);
}

/// Cryptographically secure random source backed by the OS RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand::rng().fill_bytes(dest);
    }
}

// =============================================================================
// Generator
// =============================================================================

/// Generates an order number for the given user and timestamp.
///
/// Always produces a string; there are no failure modes. Uniqueness is NOT
/// guaranteed here.
///
/// ## Example
/// ```rust
/// use apotheca_core::order_number::{generate_order_number, OsRandom};
///
/// let number = generate_order_number("user123456", 1_625_097_600_000, &mut OsRandom);
/// assert!(number.starts_with("RX-user-600000-"));
/// assert_eq!(number.len(), 19);
/// ```
pub fn generate_order_number(
    user_id: &str,
    timestamp_millis: i64,
    random: &mut dyn RandomSource,
) -> String {
    let user_segment: String = user_id.chars().take(4).collect();
    let time_segment = format!("{:06}", timestamp_millis.rem_euclid(1_000_000));

    let mut bytes = [0u8; 4];
    random.fill_bytes(&mut bytes);
    let random_segment: String = bytes.iter().map(|b| format!("{:x}", b & 0x0f)).collect();

    format!("RX-{user_segment}-{time_segment}-{random_segment}")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed byte pattern for deterministic tests.
    struct FixedRandom([u8; 4]);

    impl RandomSource for FixedRandom {
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for (d, s) in dest.iter_mut().zip(self.0.iter().cycle()) {
                *d = *s;
            }
        }
    }

    #[test]
    fn test_format_and_length() {
        let number = generate_order_number("user123456", 1_625_097_600_000, &mut OsRandom);

        assert_eq!(number.len(), 19);
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts[0], "RX");
        assert_eq!(parts[1], "user");
        assert_eq!(parts[2], "600000");
        assert!(parts[2].bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(parts[3].len(), 4);
        assert!(parts[3].bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[test]
    fn test_deterministic_with_fixed_source() {
        let mut random = FixedRandom([0xab, 0x01, 0xff, 0x10]);
        let number = generate_order_number("user123456", 1_625_097_600_000, &mut random);
        assert_eq!(number, "RX-user-600000-b1f0");
    }

    #[test]
    fn test_same_inputs_differ_only_in_suffix() {
        let a = generate_order_number("user123456", 1_625_097_600_000, &mut OsRandom);
        let b = generate_order_number("user123456", 1_625_097_600_000, &mut OsRandom);
        let c = generate_order_number("user123456", 1_625_097_600_000, &mut OsRandom);

        assert_eq!(a[..15], b[..15]);
        assert_eq!(b[..15], c[..15]);
        // 4 hex chars give 65536 values; three identical draws would be
        // a one-in-four-billion event
        assert!(!(a == b && b == c));
    }

    #[test]
    fn test_short_user_id_is_not_padded() {
        let mut random = FixedRandom([0, 0, 0, 0]);
        let number = generate_order_number("ab", 123, &mut random);
        assert_eq!(number, "RX-ab-000123-0000");
    }

    #[test]
    fn test_timestamp_keeps_last_six_digits() {
        let mut random = FixedRandom([0, 0, 0, 0]);
        let number = generate_order_number("user", 1_699_999_123_456, &mut random);
        assert_eq!(number, "RX-user-123456-0000");
    }
}
