//! Symbology knowledge for the stockscan pipeline.
//!
//! - [`format`] reconciles each detection backend's spelling of a symbol
//!   type into one canonical vocabulary.
//! - [`checkdigit`] verifies the check digits of the numeric retail formats
//!   (UPC-A/E, EAN-13/8, ISBN-10/13).
//!
//! Both modules are pure and synchronous.
//!
//! # Examples
//!
//! ```
//! use stockscan_core::EngineKind;
//! use stockscan_symbology::{normalize, validate};
//!
//! let format = normalize("ZBAR_UPCA", EngineKind::Zbar);
//! assert_eq!(format, "UPC_A");
//!
//! let result = validate("036000291452", &format);
//! assert!(result.is_valid());
//! ```

pub mod checkdigit;
pub mod format;

pub use checkdigit::{
    ValidationResult, expand_upc_e, supports_check_digit_validation, validate,
    validate_auto_detect,
};
pub use format::{canonicalize, is_1d, is_2d, normalize};
