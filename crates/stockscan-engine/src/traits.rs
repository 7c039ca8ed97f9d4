//! Detection engine and platform collaborator traits.
//!
//! [`ScannerEngine`] is the uniform contract every backend tier fulfils. It
//! uses native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT), so it is
//! not object-safe; runtime selection goes through
//! [`AnyScannerEngine`](crate::dispatch::AnyScannerEngine) instead.
//!
//! The platform collaborators ([`NativeDetector`], [`PayloadLoader`],
//! [`LinearDecoder`], [`MatrixDecoder`], [`Platform`]) are held behind
//! `Arc<dyn _>` and shared between engines and the factory, so their async
//! methods return boxed futures.

#![allow(async_fn_in_trait)]

use std::sync::Arc;

use futures::future::BoxFuture;
use stockscan_core::{DetectedBarcode, EngineKind, PixelBuffer, Point};

use crate::error::Result;
use crate::types::EngineState;

/// Uniform interface over one detection backend.
///
/// # Lifecycle
///
/// `Uninitialized -> Ready -> Disposed`, one way. `detect` is only legal in
/// `Ready`; `dispose` is legal in every state and idempotent. A disposed
/// engine cannot be initialized again.
///
/// `detect` takes `&mut self`, so callers cannot issue overlapping detect
/// calls on one engine.
pub trait ScannerEngine: Send {
    /// Backend tier of this engine.
    fn kind(&self) -> EngineKind;

    /// Stable identifier, e.g. `zbar-tier`.
    fn name(&self) -> &'static str {
        self.kind().tier_id()
    }

    /// Current lifecycle state.
    fn state(&self) -> EngineState;

    /// Whether the platform can host this engine.
    ///
    /// Never fails; a query error counts as "not supported".
    async fn is_supported(&self) -> bool;

    /// Acquire backend resources.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be brought up, or if the
    /// engine was already disposed.
    async fn initialize(&mut self) -> Result<()>;

    /// Decode every symbol visible in one frame.
    ///
    /// An empty vector means "nothing found" and is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized, was disposed, or
    /// the platform detector failed.
    async fn detect(&mut self, frame: &PixelBuffer) -> Result<Vec<DetectedBarcode>>;

    /// Release backend resources. Safe to call more than once.
    fn dispose(&mut self);

    /// Canonical names of the formats this engine can decode.
    fn supported_formats(&self) -> Vec<String>;

    /// Whether this engine can decode at least one linear symbology.
    fn supports_1d(&self) -> bool {
        self.supported_formats()
            .iter()
            .any(|f| stockscan_symbology::is_1d(f))
    }
}

/// A symbol reported by the platform detector, in its own vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeDetection {
    /// Decoded text.
    pub raw_value: String,

    /// Platform format spelling, e.g. `ean_13`.
    pub format: String,

    /// Symbol outline in frame pixels.
    pub corner_points: Vec<Point>,
}

/// Platform-provided barcode detector.
pub trait NativeDetector: Send + Sync {
    /// Format names the detector can decode, in platform spelling.
    fn supported_formats(&self) -> BoxFuture<'_, Result<Vec<String>>>;

    /// Bind the detector to a set of platform format names.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses to construct the detector.
    fn configure(&self, formats: &[String]) -> Result<()>;

    /// Analyze one frame.
    fn detect<'a>(&'a self, frame: &'a PixelBuffer) -> BoxFuture<'a, Result<Vec<NativeDetection>>>;
}

/// A symbol reported by a ZBar-style decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSymbol {
    /// Symbol type name, e.g. `ZBAR_EAN13`.
    pub type_name: String,

    /// Decoded text.
    pub data: String,

    /// Scan-line hit points in frame pixels.
    pub points: Vec<Point>,
}

/// A loaded ZBar decoder instance.
pub trait LinearDecoder: Send + Sync {
    /// Scan an 8-bit grayscale image.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder runtime faults.
    fn scan_grayscale(&self, luma: &[u8], width: u32, height: u32) -> Result<Vec<LinearSymbol>>;
}

/// Fetches and instantiates the ZBar decoder payload.
pub trait PayloadLoader: Send + Sync {
    /// Load the decoder. Called at most once per successful load.
    fn load(&self) -> BoxFuture<'_, Result<Arc<dyn LinearDecoder>>>;
}

/// A matrix symbol found by the software tier.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixHit {
    /// Decoded text.
    pub data: String,

    /// Finder-pattern corners in frame pixels.
    pub corners: Vec<Point>,
}

/// Pure software matrix-code decoder.
pub trait MatrixDecoder: Send + Sync {
    /// Decode every matrix symbol in an 8-bit grayscale image.
    fn decode(&self, luma: &[u8], width: u32, height: u32) -> Vec<MatrixHit>;
}

/// Capability surface of the host runtime.
///
/// Queried fresh on every capability check; the answer is never cached.
pub trait Platform: Send + Sync {
    /// The platform detector, if the runtime exposes one.
    fn native_detector(&self) -> Option<Arc<dyn NativeDetector>>;

    /// Payload loader for the ZBar tier, if the runtime can host it.
    fn payload_loader(&self) -> Option<Arc<dyn PayloadLoader>>;
}
