//! # Input Sanitization
//!
//! One-way sanitization policies for user-supplied text.
//!
//! ## Two Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Sanitization Policies                               │
//! │                                                                         │
//! │  sanitize_input  (storage/display fields: addresses, notes)            │
//! │  ├── trim surrounding whitespace                                       │
//! │  ├── strip HTML tags (<…> pairs)                                       │
//! │  ├── escape & < > " /                                                  │
//! │  └── truncate to 255 chars                                             │
//! │                                                                         │
//! │  sanitize_string (search/category filters)                             │
//! │  ├── trim surrounding whitespace                                       │
//! │  ├── drop < and > characters                                           │
//! │  └── truncate to 500 chars                                             │
//! │                                                                         │
//! │  The policies are distinct and NOT interchangeable.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both are applied exactly once per field before storage. `sanitize_input`
//! is not idempotent: re-running it would double-escape `&`.

use serde_json::Value;

use crate::{MAX_FILTER_LENGTH, MAX_INPUT_LENGTH};

// =============================================================================
// Storage/Display Policy
// =============================================================================

/// Sanitizes a free-text field destined for storage or display.
///
/// Trims, strips `<…>` tag pairs, escapes `& < > " /`, then truncates to
/// [`MAX_INPUT_LENGTH`] characters. Apostrophes pass through unchanged.
///
/// ## Example
/// ```rust
/// use apotheca_core::sanitize::sanitize_input;
///
/// assert_eq!(sanitize_input("<script>alert('XSS')</script>"), "alert('XSS')");
/// assert_eq!(sanitize_input("  test  "), "test");
/// assert_eq!(sanitize_input(&"a".repeat(300)).chars().count(), 255);
/// ```
pub fn sanitize_input(input: &str) -> String {
    let stripped = strip_tags(input.trim());
    escape_html(&stripped).chars().take(MAX_INPUT_LENGTH).collect()
}

/// Sanitizes a search or category filter.
///
/// Lighter policy for non-HTML contexts: trims, drops only the angle
/// brackets, truncates to [`MAX_FILTER_LENGTH`] characters.
///
/// ## Example
/// ```rust
/// use apotheca_core::sanitize::sanitize_string;
///
/// assert_eq!(sanitize_string("  blüten <10%>  "), "blüten 10%");
/// ```
pub fn sanitize_string(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(MAX_FILTER_LENGTH)
        .collect()
}

/// Sanitizes a field taken from an untrusted JSON payload.
///
/// Non-string values (numbers, null, objects, …) yield an empty string;
/// strings go through [`sanitize_input`]. Sanitizers never fail.
pub fn sanitize_field(value: &Value) -> String {
    match value.as_str() {
        Some(s) => sanitize_input(s),
        None => String::new(),
    }
}

// =============================================================================
// Internals
// =============================================================================

/// Removes `<…>` tag pairs.
///
/// An opening `<` with no closing `>` is not a tag and survives; the escape
/// pass neutralizes it afterwards.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open + 1..].find('>') {
            Some(close) => rest = &rest[open + 1 + close + 1..],
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Escapes the five HTML-significant characters `& < > " /`.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_script_tags() {
        assert_eq!(
            sanitize_input("<script>alert('XSS')</script>"),
            "alert('XSS')"
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(sanitize_input("  test  "), "test");
    }

    #[test]
    fn test_truncates_to_255() {
        let long = "a".repeat(300);
        assert_eq!(sanitize_input(&long).chars().count(), 255);
    }

    #[test]
    fn test_escapes_unsafe_characters() {
        assert_eq!(sanitize_input("Müller & Co."), "Müller &amp; Co.");
        assert_eq!(sanitize_input("5/2"), "5&#x2F;2");
        assert_eq!(sanitize_input(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_unclosed_angle_bracket_is_escaped_not_stripped() {
        assert_eq!(sanitize_input("5 < 6"), "5 &lt; 6");
    }

    #[test]
    fn test_nested_tags_removed() {
        assert_eq!(sanitize_input("<b>123</b> Main St"), "123 Main St");
    }

    #[test]
    fn test_not_idempotent_on_ampersand() {
        let once = sanitize_input("a & b");
        let twice = sanitize_input(&once);
        assert_eq!(once, "a &amp; b");
        assert_eq!(twice, "a &amp;amp; b");
    }

    #[test]
    fn test_sanitize_string_drops_angle_brackets_only() {
        assert_eq!(sanitize_string("  <thc> & cbd  "), "thc & cbd");
    }

    #[test]
    fn test_sanitize_string_truncates_to_500() {
        let long = "x".repeat(600);
        assert_eq!(sanitize_string(&long).chars().count(), 500);
    }

    #[test]
    fn test_sanitize_field_non_string_yields_empty() {
        assert_eq!(sanitize_field(&json!(42)), "");
        assert_eq!(sanitize_field(&json!(null)), "");
        assert_eq!(sanitize_field(&json!({"a": 1})), "");
        assert_eq!(sanitize_field(&json!("  ok  ")), "ok");
    }
}
