//! Check digit validation for numeric retail symbologies.
//!
//! Catches damaged labels and misreads before a scanned code reaches data
//! entry. Validation never fails with an error: every outcome, including a
//! malformed code, is a [`ValidationResult`].
//!
//! # Supported Formats
//!
//! | Format | Length | Algorithm |
//! |--------|--------|-----------|
//! | UPC-A | 12 | mod 10, weights 3/1 |
//! | EAN-13 | 13 | mod 10, weights 1/3 |
//! | EAN-8 | 8 | mod 10, weights 3/1 |
//! | UPC-E | 8 | expand to UPC-A, then UPC-A |
//! | ISBN-10 | 10 | mod 11, weights 10..1, `X` = 10 |
//! | ISBN-13 | 13 | `978`/`979` prefix, then EAN-13 |
//!
//! Formats without a standardized check digit (matrix codes, industrial
//! linear codes, the `HARDWARE` placeholder) come back valid with
//! `supports_validation() == false`: not wrong, just unchecked.
//!
//! # Examples
//!
//! ```
//! use stockscan_symbology::validate;
//!
//! let ok = validate("036000291452", "UPC_A");
//! assert!(ok.is_valid());
//!
//! let bad = validate("036000291453", "UPC_A");
//! assert!(!bad.is_valid());
//! assert_eq!(bad.error(), Some("Invalid check digit: expected 2, got 3"));
//! ```

use crate::format::canonicalize;
use serde::{Deserialize, Serialize};
use stockscan_core::constants::*;

/// Formats with a mandatory check digit this module verifies.
const VALIDATABLE_FORMATS: &[&str] = &[
    FORMAT_UPC_A,
    FORMAT_UPC_E,
    FORMAT_EAN_13,
    FORMAT_EAN_8,
    FORMAT_ISBN_10,
    FORMAT_ISBN_13,
];

/// Outcome of validating one code.
///
/// Immutable once built. `supports_validation` separates "checked and
/// failed" from "format has no checksum to check".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    is_valid: bool,
    code: String,
    format: String,
    error: Option<String>,
    supports_validation: bool,
}

impl ValidationResult {
    fn valid(code: &str, format: &str) -> Self {
        Self {
            is_valid: true,
            code: code.to_string(),
            format: format.to_string(),
            error: None,
            supports_validation: true,
        }
    }

    fn invalid(code: &str, format: &str, error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            code: code.to_string(),
            format: format.to_string(),
            error: Some(error.into()),
            supports_validation: true,
        }
    }

    fn unchecked(code: &str, format: &str) -> Self {
        Self {
            is_valid: true,
            code: code.to_string(),
            format: format.to_string(),
            error: None,
            supports_validation: false,
        }
    }

    /// Re-label a delegated result under another format, keeping its verdict.
    fn relabel(self, code: &str, format: &str) -> Self {
        Self {
            code: code.to_string(),
            format: format.to_string(),
            ..self
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Canonical format the code was validated as.
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Human-readable reason when `is_valid()` is false.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn supports_validation(&self) -> bool {
        self.supports_validation
    }
}

/// Whether `format` carries a check digit this module can verify.
///
/// # Examples
///
/// ```
/// use stockscan_symbology::supports_check_digit_validation;
///
/// assert!(supports_check_digit_validation("EAN_13"));
/// assert!(!supports_check_digit_validation("QR_CODE"));
/// assert!(!supports_check_digit_validation("HARDWARE"));
/// ```
pub fn supports_check_digit_validation(format: &str) -> bool {
    VALIDATABLE_FORMATS.contains(&format)
}

/// Compute a mod-10 check digit.
///
/// Positions are 1-based: odd positions get `odd_weight`, even positions
/// get `even_weight`.
pub fn mod10_check_digit(digits: &[u8], odd_weight: u32, even_weight: u32) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let weight = if i % 2 == 0 { odd_weight } else { even_weight };
            d as u32 * weight
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

fn digits_of(code: &str, len: usize) -> Option<Vec<u8>> {
    if code.len() != len || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(code.bytes().map(|b| b - b'0').collect())
}

fn is_isbn10_shape(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 10
        && bytes[..9].iter().all(u8::is_ascii_digit)
        && (bytes[9].is_ascii_digit() || bytes[9] == b'X' || bytes[9] == b'x')
}

/// Shared body for the mod-10 formats: length check then weighted sum.
fn validate_mod10(
    code: &str,
    format: &str,
    len: usize,
    odd_weight: u32,
    even_weight: u32,
    length_error: &str,
) -> ValidationResult {
    let Some(digits) = digits_of(code, len) else {
        return ValidationResult::invalid(code, format, length_error);
    };

    let (body, check) = digits.split_at(len - 1);
    let expected = mod10_check_digit(body, odd_weight, even_weight);
    let actual = check[0];

    if expected != actual {
        return ValidationResult::invalid(
            code,
            format,
            format!("Invalid check digit: expected {expected}, got {actual}"),
        );
    }

    ValidationResult::valid(code, format)
}

/// Validate a 12-digit UPC-A code.
pub fn validate_upc_a(code: &str) -> ValidationResult {
    validate_mod10(
        code,
        FORMAT_UPC_A,
        12,
        3,
        1,
        "UPC-A must be exactly 12 digits",
    )
}

/// Validate a 13-digit EAN-13 code.
pub fn validate_ean_13(code: &str) -> ValidationResult {
    validate_mod10(
        code,
        FORMAT_EAN_13,
        13,
        1,
        3,
        "EAN-13 must be exactly 13 digits",
    )
}

/// Validate an 8-digit EAN-8 code.
pub fn validate_ean_8(code: &str) -> ValidationResult {
    validate_mod10(code, FORMAT_EAN_8, 8, 3, 1, "EAN-8 must be exactly 8 digits")
}

/// Expand an 8-digit UPC-E code to its 12-digit UPC-A form.
///
/// The seventh digit selects the compression pattern:
///
/// | Digit | Manufacturer | Expansion |
/// |-------|--------------|-----------|
/// | 0-2 | `AB?00` | `N AB d 0000 CDE K` |
/// | 3 | `ABC00` | `N ABC 00000 DE K` |
/// | 4 | `ABCD0` | `N ABCD 00000 E K` |
/// | 5-9 | `ABCDE` | `N ABCDE 0000 d K` |
///
/// Returns `None` when the input is not eight ASCII digits.
///
/// # Examples
///
/// ```
/// use stockscan_symbology::expand_upc_e;
///
/// assert_eq!(expand_upc_e("04252614").as_deref(), Some("042100005264"));
/// assert_eq!(expand_upc_e("0425261"), None);
/// ```
pub fn expand_upc_e(upc_e: &str) -> Option<String> {
    digits_of(upc_e, 8)?;

    let number_system = &upc_e[0..1];
    let manufacturer = &upc_e[1..6];
    let pattern = &upc_e[6..7];
    let check = &upc_e[7..8];

    let expanded = match pattern.as_bytes()[0] {
        b'0'..=b'2' => format!(
            "{number_system}{}{pattern}0000{}{check}",
            &manufacturer[..2],
            &manufacturer[2..]
        ),
        b'3' => format!(
            "{number_system}{}00000{}{check}",
            &manufacturer[..3],
            &manufacturer[3..]
        ),
        b'4' => format!(
            "{number_system}{}00000{}{check}",
            &manufacturer[..4],
            &manufacturer[4..]
        ),
        b'5'..=b'9' => format!("{number_system}{manufacturer}0000{pattern}{check}"),
        _ => return None,
    };

    Some(expanded)
}

/// Validate an 8-digit UPC-E code by expanding it to UPC-A.
///
/// An unrecognized compression pattern is reported as its own error, never
/// as a check digit mismatch.
pub fn validate_upc_e(code: &str) -> ValidationResult {
    if digits_of(code, 8).is_none() {
        return ValidationResult::invalid(code, FORMAT_UPC_E, "UPC-E must be exactly 8 digits");
    }

    if !code.starts_with(['0', '1']) {
        return ValidationResult::invalid(code, FORMAT_UPC_E, "UPC-E must start with 0 or 1");
    }

    let Some(expanded) = expand_upc_e(code) else {
        return ValidationResult::invalid(code, FORMAT_UPC_E, "Invalid UPC-E compression pattern");
    };

    validate_upc_a(&expanded).relabel(code, FORMAT_UPC_E)
}

/// Validate an ISBN-10 (nine digits then a digit or `X`).
pub fn validate_isbn_10(code: &str) -> ValidationResult {
    if !is_isbn10_shape(code) {
        return ValidationResult::invalid(
            code,
            FORMAT_ISBN_10,
            "ISBN-10 must be 9 digits followed by a digit or X",
        );
    }

    let sum: u32 = code
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let value = match b {
                b'X' | b'x' => 10,
                digit => (digit - b'0') as u32,
            };
            value * (10 - i as u32)
        })
        .sum();

    if sum % 11 != 0 {
        return ValidationResult::invalid(code, FORMAT_ISBN_10, "Invalid ISBN-10 check digit");
    }

    ValidationResult::valid(code, FORMAT_ISBN_10)
}

/// Validate an ISBN-13: a `978`/`979` prefixed EAN-13.
pub fn validate_isbn_13(code: &str) -> ValidationResult {
    if !code.starts_with("978") && !code.starts_with("979") {
        return ValidationResult::invalid(
            code,
            FORMAT_ISBN_13,
            "ISBN-13 must start with 978 or 979",
        );
    }

    validate_ean_13(code).relabel(code, FORMAT_ISBN_13)
}

/// Validate `code` as the given format.
///
/// The format name is canonicalized first, so `EAN-13`, `ean_13` and
/// `EAN_13` route the same way.
///
/// # Examples
///
/// ```
/// use stockscan_symbology::validate;
///
/// assert!(validate("5901234123457", "ean-13").is_valid());
///
/// let qr = validate("https://example.com", "QR_CODE");
/// assert!(qr.is_valid());
/// assert!(!qr.supports_validation());
/// ```
pub fn validate(code: &str, format: &str) -> ValidationResult {
    let format = canonicalize(format);

    match format.as_str() {
        FORMAT_UPC_A => validate_upc_a(code),
        FORMAT_UPC_E => validate_upc_e(code),
        FORMAT_EAN_13 => validate_ean_13(code),
        FORMAT_EAN_8 => validate_ean_8(code),
        FORMAT_ISBN_10 => validate_isbn_10(code),
        FORMAT_ISBN_13 => validate_isbn_13(code),
        // Matrix codes, industrial linear codes and the hardware placeholder
        _ => ValidationResult::unchecked(code, &format),
    }
}

/// Infer the format from the code's shape, then validate.
///
/// Used when no format is known, e.g. for keyboard-wedge input. Shapes are
/// tried in a fixed order so ambiguous codes resolve deterministically:
///
/// 1. ISBN-10 (nine digits then digit or `X`)
/// 2. ISBN-13 (`978`/`979` plus ten digits)
/// 3. UPC-A (12 digits)
/// 4. EAN-13 (13 digits)
/// 5. 8 digits: EAN-8, then UPC-E if EAN-8 fails
/// 6. Anything else: `UNKNOWN`, unchecked
///
/// # Examples
///
/// ```
/// use stockscan_symbology::validate_auto_detect;
///
/// let result = validate_auto_detect("9780306406157");
/// assert!(result.is_valid());
/// assert_eq!(result.format(), "ISBN_13");
/// ```
pub fn validate_auto_detect(code: &str) -> ValidationResult {
    let code = code.trim();

    if is_isbn10_shape(code) {
        return validate_isbn_10(code);
    }

    let all_digits = !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit());

    match code.len() {
        13 if all_digits && (code.starts_with("978") || code.starts_with("979")) => {
            validate_isbn_13(code)
        }
        12 if all_digits => validate_upc_a(code),
        13 if all_digits => validate_ean_13(code),
        8 if all_digits => {
            let ean_8 = validate_ean_8(code);
            if ean_8.is_valid() {
                return ean_8;
            }
            validate_upc_e(code)
        }
        _ => ValidationResult::unchecked(code, FORMAT_UNKNOWN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("012345678905")]
    #[case("042100005264")]
    #[case("012000001086")]
    #[case("049000006346")]
    #[case("036000291452")]
    fn test_upc_a_valid(#[case] code: &str) {
        let result = validate_upc_a(code);
        assert!(result.is_valid(), "{code}: {:?}", result.error());
        assert!(result.supports_validation());
        assert_eq!(result.format(), FORMAT_UPC_A);
    }

    #[test]
    fn test_upc_a_corrupted_check_digit() {
        let result = validate("036000291453", "UPC_A");
        assert!(!result.is_valid());
        assert_eq!(
            result.error(),
            Some("Invalid check digit: expected 2, got 3")
        );
    }

    #[rstest]
    #[case("12345")]
    #[case("1234567890123")]
    #[case("01234567890A")]
    fn test_upc_a_malformed(#[case] code: &str) {
        let result = validate_upc_a(code);
        assert!(!result.is_valid());
        assert_eq!(result.error(), Some("UPC-A must be exactly 12 digits"));
    }

    #[rstest]
    #[case("01234505", "012000003455")]
    #[case("04252614", "042100005264")]
    #[case("01234531", "012300000451")]
    #[case("01234543", "012340000053")]
    #[case("01234565", "012345000065")]
    fn test_upc_e_expansion_patterns(#[case] upc_e: &str, #[case] upc_a: &str) {
        assert_eq!(expand_upc_e(upc_e).as_deref(), Some(upc_a));

        // The expanded form's check digit matches the UPC-E trailing digit
        assert!(validate_upc_a(upc_a).is_valid());
        assert!(validate_upc_e(upc_e).is_valid());
    }

    #[test]
    fn test_upc_e_must_start_with_0_or_1() {
        let result = validate_upc_e("21234565");
        assert!(!result.is_valid());
        assert!(result.error().unwrap().contains("start with 0 or 1"));
    }

    #[test]
    fn test_upc_e_bad_check_digit_keeps_format() {
        let result = validate_upc_e("01234566");
        assert!(!result.is_valid());
        assert_eq!(result.format(), FORMAT_UPC_E);
        assert_eq!(
            result.error(),
            Some("Invalid check digit: expected 5, got 6")
        );
    }

    #[rstest]
    #[case("1234567")]
    #[case("123456789")]
    fn test_upc_e_wrong_length(#[case] code: &str) {
        assert!(!validate_upc_e(code).is_valid());
    }

    #[rstest]
    #[case("5901234123457")]
    #[case("4006381333931")]
    #[case("8710398506870")]
    fn test_ean_13_valid(#[case] code: &str) {
        assert!(validate_ean_13(code).is_valid());
    }

    #[test]
    fn test_ean_13_invalid_check_digit() {
        let result = validate_ean_13("5901234123458");
        assert!(!result.is_valid());
        assert!(result.error().unwrap().contains("expected 7"));
    }

    #[rstest]
    #[case("96385074")]
    #[case("65833254")]
    fn test_ean_8_valid(#[case] code: &str) {
        assert!(validate_ean_8(code).is_valid());
    }

    #[test]
    fn test_ean_8_invalid() {
        assert!(!validate_ean_8("96385075").is_valid());
        assert!(!validate_ean_8("1234567").is_valid());
    }

    #[rstest]
    #[case("0306406152")]
    #[case("0471958697")]
    #[case("155860832X")]
    #[case("155860832x")]
    fn test_isbn_10_valid(#[case] code: &str) {
        assert!(validate_isbn_10(code).is_valid());
    }

    #[rstest]
    #[case("0306406153")]
    #[case("123456789")]
    #[case("12345678901")]
    #[case("030640615A")]
    fn test_isbn_10_invalid(#[case] code: &str) {
        assert!(!validate_isbn_10(code).is_valid());
    }

    #[rstest]
    #[case("9780306406157")]
    #[case("9780471958697")]
    #[case("9791234567896")]
    fn test_isbn_13_valid(#[case] code: &str) {
        let result = validate_isbn_13(code);
        assert!(result.is_valid());
        assert_eq!(result.format(), FORMAT_ISBN_13);
    }

    #[test]
    fn test_isbn_13_prefix() {
        let result = validate_isbn_13("5901234123457");
        assert!(!result.is_valid());
        assert!(result.error().unwrap().contains("978 or 979"));
    }

    #[rstest]
    #[case("QR_CODE")]
    #[case("CODE_128")]
    #[case("DATA_MATRIX")]
    #[case("ITF")]
    #[case("HARDWARE")]
    fn test_unchecked_formats(#[case] format: &str) {
        let result = validate("ANYTHING-123", format);
        assert!(result.is_valid());
        assert!(!result.supports_validation());
        assert_eq!(result.format(), format);
    }

    #[rstest]
    #[case("EAN-13")]
    #[case("ean_13")]
    #[case("Ean-13")]
    fn test_format_name_variations(#[case] format: &str) {
        let result = validate("5901234123457", format);
        assert!(result.is_valid());
        assert_eq!(result.format(), FORMAT_EAN_13);
    }

    #[rstest]
    #[case("036000291452", FORMAT_UPC_A)]
    #[case("5901234123457", FORMAT_EAN_13)]
    #[case("9780306406157", FORMAT_ISBN_13)]
    #[case("9791234567896", FORMAT_ISBN_13)]
    #[case("0306406152", FORMAT_ISBN_10)]
    #[case("96385074", FORMAT_EAN_8)]
    #[case("  036000291452\n", FORMAT_UPC_A)]
    fn test_auto_detect(#[case] code: &str, #[case] format: &str) {
        let result = validate_auto_detect(code);
        assert!(result.is_valid(), "{code}: {:?}", result.error());
        assert_eq!(result.format(), format);
    }

    #[test]
    fn test_auto_detect_isbn_13_precedes_ean_13() {
        // Bad check digit still reports as ISBN-13, not as generic EAN-13
        let result = validate_auto_detect("9780306406158");
        assert!(!result.is_valid());
        assert_eq!(result.format(), FORMAT_ISBN_13);
    }

    #[test]
    fn test_auto_detect_falls_back_to_upc_e() {
        // Not a valid EAN-8 but a valid UPC-E
        assert!(!validate_ean_8("04252614").is_valid());
        let result = validate_auto_detect("04252614");
        assert!(result.is_valid());
        assert_eq!(result.format(), FORMAT_UPC_E);
    }

    #[test]
    fn test_auto_detect_unknown() {
        let result = validate_auto_detect("ABC-123");
        assert!(result.is_valid());
        assert!(!result.supports_validation());
        assert_eq!(result.format(), FORMAT_UNKNOWN);
    }

    #[test]
    fn test_supports_check_digit_validation() {
        for format in VALIDATABLE_FORMATS {
            assert!(supports_check_digit_validation(format));
        }
        assert!(!supports_check_digit_validation(FORMAT_CODE_39));
    }

    #[test]
    fn test_validation_result_serialization() {
        let result = validate("036000291453", "UPC_A");
        let json = serde_json::to_string(&result).unwrap();
        let back: ValidationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
