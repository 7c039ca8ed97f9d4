//! Shared data model for the stockscan barcode acquisition pipeline.
//!
//! Every other crate in the workspace speaks in terms of the types defined
//! here: frames handed to detection engines ([`PixelBuffer`]), per-frame
//! decode results ([`DetectedBarcode`]) and the accepted scan that leaves the
//! pipeline ([`ScanResult`]).

pub mod constants;
pub mod error;
pub mod feedback;
pub mod mock;
pub mod types;

pub use error::{Error, Result};
pub use feedback::{ScanFeedback, SilentFeedback};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
