//! Internal helpers for text normalization.
//!
//! These utilities are **not** part of the public API. Matching user
//! text against category/payment-mode names must survive case,
//! diacritics and irregular spacing, so both sides go through the same
//! normalization.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Lowercase, strip combining marks, collapse runs of non-alphanumeric
/// characters into single spaces.
pub(crate) fn normalize(input: &str) -> String {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in input.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_collapses() {
        assert_eq!(normalize("  Credit   Card "), "credit card");
    }

    #[test]
    fn normalize_strips_diacritics() {
        assert_eq!(normalize("Café"), "cafe");
    }
}
