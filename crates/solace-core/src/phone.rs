// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! E.164 phone number validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::SolaceError;

static E164: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").expect("hardcoded regex"));

/// Strip spaces and check the result is an E.164 number.
///
/// Returns the normalized number on success.
pub fn normalize_e164(raw: &str) -> Result<String, SolaceError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if E164.is_match(&compact) {
        Ok(compact)
    } else {
        Err(SolaceError::Validation(format!(
            "`{raw}` is not an E.164 phone number"
        )))
    }
}

/// Whether `raw` is an E.164 number once spaces are removed.
pub fn is_e164(raw: &str) -> bool {
    normalize_e164(raw).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_e164() {
        assert_eq!(normalize_e164("+15551234567").unwrap(), "+15551234567");
    }

    #[test]
    fn strips_spaces() {
        assert_eq!(normalize_e164(" +1 555 123 4567 ").unwrap(), "+15551234567");
    }

    #[test]
    fn rejects_missing_plus_and_leading_zero() {
        assert!(!is_e164("15551234567"));
        assert!(!is_e164("+05551234567"));
    }

    #[test]
    fn rejects_too_long_and_non_digits() {
        assert!(!is_e164("+1234567890123456"));
        assert!(!is_e164("+1555-123-4567"));
        assert!(!is_e164(""));
    }

    #[test]
    fn error_is_validation() {
        let err = normalize_e164("nope").unwrap_err();
        assert!(matches!(err, SolaceError::Validation(_)));
    }
}
