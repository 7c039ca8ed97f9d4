//! Property-based tests for check digit validation.
//!
//! These tests generate random digit bodies, compute the check digit with the
//! published weighting, and verify that the validator accepts exactly the
//! correct code and rejects every single-digit corruption of it.

use proptest::prelude::*;
use stockscan_core::EngineKind;
use stockscan_symbology::checkdigit::{mod10_check_digit, validate_ean_13, validate_upc_a};
use stockscan_symbology::{normalize, validate, validate_auto_detect};

fn digits(len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..=9, len)
}

fn to_code(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

proptest! {
    /// Property: a UPC-A built with the 3/1 weighting always validates.
    #[test]
    fn prop_upc_a_with_computed_check_is_valid(body in digits(11)) {
        let mut full = body.clone();
        full.push(mod10_check_digit(&body, 3, 1));
        let code = to_code(&full);

        let result = validate(&code, "UPC_A");
        prop_assert!(result.is_valid(), "{}: {:?}", code, result.error());
    }

    /// Property: changing any one digit of a valid UPC-A invalidates it and
    /// the error names the recomputed expected digit.
    #[test]
    fn prop_upc_a_single_digit_corruption_detected(
        body in digits(11),
        position in 0usize..12,
        delta in 1u8..=9,
    ) {
        let mut full = body.clone();
        full.push(mod10_check_digit(&body, 3, 1));
        full[position] = (full[position] + delta) % 10;
        let code = to_code(&full);

        let expected = mod10_check_digit(&full[..11], 3, 1);
        let result = validate_upc_a(&code);

        prop_assert!(!result.is_valid());
        let message = format!("Invalid check digit: expected {}, got {}", expected, full[11]);
        prop_assert_eq!(result.error(), Some(message.as_str()));
    }

    /// Property: a 13-digit code with a 978/979 prefix always auto-detects
    /// as ISBN-13, valid or not.
    #[test]
    fn prop_bookland_prefix_detected_as_isbn_13(
        prefix in prop_oneof![Just("978"), Just("979")],
        rest in digits(10),
    ) {
        let code = format!("{}{}", prefix, to_code(&rest));
        let result = validate_auto_detect(&code);
        prop_assert_eq!(result.format(), "ISBN_13");
        prop_assert_eq!(result.is_valid(), validate_ean_13(&code).is_valid());
    }

    /// Property: validation never panics on arbitrary input.
    #[test]
    fn prop_validate_total(code in ".{0,20}", format in "[A-Za-z_-]{0,12}") {
        let _ = validate(&code, &format);
        let _ = validate_auto_detect(&code);
    }
}

#[test]
fn test_ean_13_spellings_normalize_identically() {
    let canonical: Vec<String> = [
        ("ean_13", EngineKind::Native),
        ("ZBAR_EAN13", EngineKind::Zbar),
        ("EAN-13", EngineKind::Zbar),
    ]
    .into_iter()
    .map(|(name, backend)| normalize(name, backend))
    .collect();

    assert!(canonical.iter().all(|c| c == "EAN_13"), "{canonical:?}");
}
