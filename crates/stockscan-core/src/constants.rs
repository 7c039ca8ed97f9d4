//! Canonical symbology names and pipeline defaults.
//!
//! Every detection backend reports symbol types in its own spelling. The
//! normalizer in `stockscan-symbology` maps those spellings onto the names
//! defined here, so the rest of the pipeline (validation, inventory lookup)
//! only ever compares against these constants.
//!
//! # Usage
//!
//! ```
//! use stockscan_core::constants::*;
//!
//! assert_eq!(FORMAT_EAN_13, "EAN_13");
//! assert!(MATRIX_FORMATS.contains(&FORMAT_QR_CODE));
//!
//! use std::time::Duration;
//! let gap = Duration::from_millis(DEFAULT_BURST_GAP_MS);
//! assert_eq!(gap.as_millis(), 50);
//! ```

// ============================================================================
// Canonical Format Names
// ============================================================================

/// QR Code (2D matrix).
pub const FORMAT_QR_CODE: &str = "QR_CODE";

/// Data Matrix (2D matrix).
pub const FORMAT_DATA_MATRIX: &str = "DATA_MATRIX";

/// Aztec (2D matrix).
pub const FORMAT_AZTEC: &str = "AZTEC";

/// PDF417 (stacked linear, treated as 2D).
pub const FORMAT_PDF_417: &str = "PDF_417";

/// EAN-13 retail code.
pub const FORMAT_EAN_13: &str = "EAN_13";

/// EAN-8 retail code.
pub const FORMAT_EAN_8: &str = "EAN_8";

/// UPC-A retail code.
pub const FORMAT_UPC_A: &str = "UPC_A";

/// UPC-E (zero-suppressed UPC-A).
pub const FORMAT_UPC_E: &str = "UPC_E";

/// Code 128 industrial code.
pub const FORMAT_CODE_128: &str = "CODE_128";

/// Code 39 industrial code.
pub const FORMAT_CODE_39: &str = "CODE_39";

/// Code 93 industrial code.
pub const FORMAT_CODE_93: &str = "CODE_93";

/// Codabar.
pub const FORMAT_CODABAR: &str = "CODABAR";

/// Interleaved 2 of 5.
pub const FORMAT_ITF: &str = "ITF";

/// GS1 DataBar (omnidirectional).
pub const FORMAT_DATABAR: &str = "DATABAR";

/// GS1 DataBar Expanded.
pub const FORMAT_DATABAR_EXP: &str = "DATABAR_EXP";

/// ISBN-10 (book numbering, mod-11 check).
pub const FORMAT_ISBN_10: &str = "ISBN_10";

/// ISBN-13 (EAN-13 restricted to the 978/979 prefixes).
pub const FORMAT_ISBN_13: &str = "ISBN_13";

/// Placeholder reported by keyboard-wedge scanners, which do not tell us
/// which symbology they decoded.
pub const FORMAT_HARDWARE: &str = "HARDWARE";

/// Result of auto-detection when the code shape matches no known format.
pub const FORMAT_UNKNOWN: &str = "UNKNOWN";

/// Two-dimensional (matrix) symbologies.
pub const MATRIX_FORMATS: &[&str] = &[
    FORMAT_QR_CODE,
    FORMAT_DATA_MATRIX,
    FORMAT_AZTEC,
    FORMAT_PDF_417,
];

/// One-dimensional (linear) symbologies.
pub const LINEAR_FORMATS: &[&str] = &[
    FORMAT_EAN_13,
    FORMAT_EAN_8,
    FORMAT_UPC_A,
    FORMAT_UPC_E,
    FORMAT_CODE_128,
    FORMAT_CODE_39,
    FORMAT_CODE_93,
    FORMAT_CODABAR,
    FORMAT_ITF,
    FORMAT_DATABAR,
    FORMAT_DATABAR_EXP,
    FORMAT_ISBN_10,
    FORMAT_ISBN_13,
];

// ============================================================================
// Hardware (keyboard-wedge) Scanner Defaults
// ============================================================================

/// Maximum gap between two keystrokes of the same scanner burst.
///
/// Scanners type at machine speed; anything slower is treated as a human
/// and resets the accumulated buffer.
pub const DEFAULT_BURST_GAP_MS: u64 = 50;

/// Shortest buffer accepted as a barcode when the accept key arrives.
pub const DEFAULT_MIN_BARCODE_LENGTH: usize = 4;

/// Minimum time between two accepted hardware scans.
pub const DEFAULT_HARDWARE_DEBOUNCE_MS: u64 = 300;

// ============================================================================
// Camera Defaults
// ============================================================================

/// Ideal capture width in pixels.
pub const DEFAULT_CAMERA_WIDTH: u32 = 1280;

/// Ideal capture height in pixels.
pub const DEFAULT_CAMERA_HEIGHT: u32 = 720;

/// Ideal capture frame rate.
pub const DEFAULT_CAMERA_FRAME_RATE: u32 = 30;

/// Lowest acceptable capture width.
pub const MIN_CAMERA_WIDTH: u32 = 640;

/// Lowest acceptable capture height.
pub const MIN_CAMERA_HEIGHT: u32 = 480;

/// Lowest acceptable frame rate.
pub const MIN_CAMERA_FRAME_RATE: u32 = 15;

/// Delay between releasing one camera and acquiring another.
pub const CAMERA_SETTLE_DELAY_MS: u64 = 300;

// ============================================================================
// Camera Session Defaults
// ============================================================================

/// Target detection rate for the camera poll loop.
pub const DEFAULT_TARGET_FPS: u32 = 30;

/// Minimum time between two accepted camera scans.
pub const DEFAULT_CAMERA_DEBOUNCE_MS: u64 = 1500;

/// Longest wait for the bound video surface to deliver its first frame.
pub const DEFAULT_VIDEO_READY_TIMEOUT_MS: u64 = 10_000;

/// Poll interval while waiting for the video surface.
pub const VIDEO_READY_POLL_MS: u64 = 50;

/// Bytes per pixel in a [`PixelBuffer`](crate::PixelBuffer) (RGBA8).
pub const BYTES_PER_PIXEL: usize = 4;

// ============================================================================
// Scan Feedback
// ============================================================================

/// Vibration length fired on an accepted scan.
pub const SCAN_VIBRATION_MS: u64 = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_and_linear_sets_are_disjoint() {
        for format in MATRIX_FORMATS {
            assert!(!LINEAR_FORMATS.contains(format), "{format} in both sets");
        }
    }

    #[test]
    fn test_hardware_defaults() {
        assert_eq!(DEFAULT_BURST_GAP_MS, 50);
        assert_eq!(DEFAULT_MIN_BARCODE_LENGTH, 4);
        assert_eq!(DEFAULT_HARDWARE_DEBOUNCE_MS, 300);
    }

    #[test]
    fn test_camera_minimums_below_defaults() {
        assert!(MIN_CAMERA_WIDTH <= DEFAULT_CAMERA_WIDTH);
        assert!(MIN_CAMERA_HEIGHT <= DEFAULT_CAMERA_HEIGHT);
        assert!(MIN_CAMERA_FRAME_RATE <= DEFAULT_CAMERA_FRAME_RATE);
    }
}
