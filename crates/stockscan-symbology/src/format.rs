//! Format name normalization across detection backends.
//!
//! The three backend tiers each report symbol types in their own spelling:
//!
//! | Symbol | Native | ZBar | Software |
//! |--------|--------|------|----------|
//! | EAN-13 | `ean_13` | `ZBAR_EAN13` / `EAN-13` | - |
//! | QR     | `qr_code` | `ZBAR_QRCODE` / `QR-Code` | `qr` |
//!
//! [`normalize`] maps every spelling of the same physical symbol type to a
//! single canonical name from [`stockscan_core::constants`], so validation
//! and downstream business logic never branch on which backend decoded it.
//!
//! Lookup order per backend table:
//!
//! 1. Exact match.
//! 2. ASCII case-insensitive match.
//! 3. Generic fallback: uppercase, separators replaced with `_`.

use stockscan_core::EngineKind;
use stockscan_core::constants::*;

type FormatTable = &'static [(&'static str, &'static str)];

/// Native platform detector spellings.
const NATIVE_FORMATS: FormatTable = &[
    ("qr_code", FORMAT_QR_CODE),
    ("data_matrix", FORMAT_DATA_MATRIX),
    ("aztec", FORMAT_AZTEC),
    ("pdf417", FORMAT_PDF_417),
    ("ean_13", FORMAT_EAN_13),
    ("ean_8", FORMAT_EAN_8),
    ("upc_a", FORMAT_UPC_A),
    ("upc_e", FORMAT_UPC_E),
    ("code_128", FORMAT_CODE_128),
    ("code_39", FORMAT_CODE_39),
    ("code_93", FORMAT_CODE_93),
    ("codabar", FORMAT_CODABAR),
    ("itf", FORMAT_ITF),
];

/// ZBar symbol type names, both the enum spelling and the display name.
const ZBAR_FORMATS: FormatTable = &[
    ("ZBAR_EAN13", FORMAT_EAN_13),
    ("ZBAR_EAN8", FORMAT_EAN_8),
    ("ZBAR_UPCA", FORMAT_UPC_A),
    ("ZBAR_UPCE", FORMAT_UPC_E),
    ("ZBAR_ISBN10", FORMAT_ISBN_10),
    ("ZBAR_ISBN13", FORMAT_ISBN_13),
    ("ZBAR_I25", FORMAT_ITF),
    ("ZBAR_CODE39", FORMAT_CODE_39),
    ("ZBAR_CODE93", FORMAT_CODE_93),
    ("ZBAR_CODE128", FORMAT_CODE_128),
    ("ZBAR_CODABAR", FORMAT_CODABAR),
    ("ZBAR_DATABAR", FORMAT_DATABAR),
    ("ZBAR_DATABAR_EXP", FORMAT_DATABAR_EXP),
    ("ZBAR_PDF417", FORMAT_PDF_417),
    ("ZBAR_QRCODE", FORMAT_QR_CODE),
    ("EAN-13", FORMAT_EAN_13),
    ("EAN-8", FORMAT_EAN_8),
    ("UPC-A", FORMAT_UPC_A),
    ("UPC-E", FORMAT_UPC_E),
    ("ISBN-10", FORMAT_ISBN_10),
    ("ISBN-13", FORMAT_ISBN_13),
    ("I2/5", FORMAT_ITF),
    ("CODE-39", FORMAT_CODE_39),
    ("CODE-93", FORMAT_CODE_93),
    ("CODE-128", FORMAT_CODE_128),
    ("Codabar", FORMAT_CODABAR),
    ("DataBar", FORMAT_DATABAR),
    ("DataBar-Exp", FORMAT_DATABAR_EXP),
    ("PDF417", FORMAT_PDF_417),
    ("QR-Code", FORMAT_QR_CODE),
];

/// Software tier spellings. It reads a single matrix family.
const JSQR_FORMATS: FormatTable = &[("qr", FORMAT_QR_CODE), ("qrcode", FORMAT_QR_CODE)];

fn table_for(backend: EngineKind) -> FormatTable {
    match backend {
        EngineKind::Native => NATIVE_FORMATS,
        EngineKind::Zbar => ZBAR_FORMATS,
        EngineKind::Jsqr => JSQR_FORMATS,
    }
}

/// Map a backend's native format name to the canonical name.
///
/// # Examples
///
/// ```
/// use stockscan_core::EngineKind;
/// use stockscan_symbology::normalize;
///
/// assert_eq!(normalize("ean_13", EngineKind::Native), "EAN_13");
/// assert_eq!(normalize("ZBAR_EAN13", EngineKind::Zbar), "EAN_13");
/// assert_eq!(normalize("qr", EngineKind::Jsqr), "QR_CODE");
///
/// // Names missing from the table fall back to a generic rewrite
/// assert_eq!(normalize("maxi-code", EngineKind::Native), "MAXI_CODE");
/// ```
pub fn normalize(native_name: &str, backend: EngineKind) -> String {
    let table = table_for(backend);

    if let Some((_, canonical)) = table.iter().find(|(name, _)| *name == native_name) {
        return (*canonical).to_string();
    }

    if let Some((_, canonical)) = table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(native_name))
    {
        return (*canonical).to_string();
    }

    canonicalize(native_name)
}

/// Generic rewrite: trim, uppercase, and turn separators into `_`.
///
/// # Examples
///
/// ```
/// use stockscan_symbology::canonicalize;
///
/// assert_eq!(canonicalize("ean-13"), "EAN_13");
/// assert_eq!(canonicalize(" Data Matrix "), "DATA_MATRIX");
/// ```
pub fn canonicalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' | '.' | '/' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Whether a canonical format is a linear (1D) symbology.
///
/// `HARDWARE` and unknown names are neither 1D nor 2D.
pub fn is_1d(format: &str) -> bool {
    LINEAR_FORMATS.contains(&format)
}

/// Whether a canonical format is a matrix (2D) symbology.
pub fn is_2d(format: &str) -> bool {
    MATRIX_FORMATS.contains(&format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ean_13", EngineKind::Native)]
    #[case("EAN_13", EngineKind::Native)]
    #[case("ZBAR_EAN13", EngineKind::Zbar)]
    #[case("EAN-13", EngineKind::Zbar)]
    #[case("ean-13", EngineKind::Zbar)]
    fn test_ean13_consistent_across_backends(#[case] native: &str, #[case] backend: EngineKind) {
        assert_eq!(normalize(native, backend), FORMAT_EAN_13);
    }

    #[rstest]
    #[case("qr_code", EngineKind::Native)]
    #[case("ZBAR_QRCODE", EngineKind::Zbar)]
    #[case("QR-Code", EngineKind::Zbar)]
    #[case("qr", EngineKind::Jsqr)]
    #[case("QR", EngineKind::Jsqr)]
    fn test_qr_consistent_across_backends(#[case] native: &str, #[case] backend: EngineKind) {
        assert_eq!(normalize(native, backend), FORMAT_QR_CODE);
    }

    #[test]
    fn test_zbar_interleaved_2_of_5() {
        assert_eq!(normalize("ZBAR_I25", EngineKind::Zbar), FORMAT_ITF);
        assert_eq!(normalize("I2/5", EngineKind::Zbar), FORMAT_ITF);
    }

    #[test]
    fn test_fallback_rewrites_separators() {
        assert_eq!(normalize("gs1 data-bar", EngineKind::Native), "GS1_DATA_BAR");
        assert_eq!(normalize("unknown", EngineKind::Jsqr), "UNKNOWN");
    }

    #[test]
    fn test_classification() {
        assert!(is_2d(FORMAT_QR_CODE));
        assert!(is_2d(FORMAT_PDF_417));
        assert!(!is_1d(FORMAT_QR_CODE));

        assert!(is_1d(FORMAT_UPC_A));
        assert!(is_1d(FORMAT_ITF));
        assert!(!is_2d(FORMAT_EAN_8));

        assert!(!is_1d(FORMAT_HARDWARE));
        assert!(!is_2d(FORMAT_HARDWARE));
    }

    #[test]
    fn test_every_table_entry_is_canonical() {
        for backend in EngineKind::RANKED {
            for (_, canonical) in table_for(backend) {
                assert!(
                    is_1d(canonical) || is_2d(canonical),
                    "{canonical} is neither linear nor matrix"
                );
            }
        }
    }
}
