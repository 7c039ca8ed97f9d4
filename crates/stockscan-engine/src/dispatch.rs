//! Enum wrapper for engine dispatch.
//!
//! [`ScannerEngine`] uses native `async fn`, so it cannot be boxed as a
//! trait object. The factory picks a tier at runtime and hands it back as
//! an [`AnyScannerEngine`], which forwards every call to the concrete
//! backend.
//!
//! # Examples
//!
//! ```
//! use stockscan_engine::backends::JsqrEngine;
//! use stockscan_engine::dispatch::AnyScannerEngine;
//! use stockscan_engine::traits::ScannerEngine;
//!
//! #[tokio::main]
//! async fn main() -> stockscan_engine::Result<()> {
//!     let mut engine = AnyScannerEngine::Jsqr(JsqrEngine::new());
//!     engine.initialize().await?;
//!     assert_eq!(engine.name(), "jsqr-tier");
//!     Ok(())
//! }
//! ```

use stockscan_core::{DetectedBarcode, EngineKind, PixelBuffer};

use crate::Result;
use crate::backends::{JsqrEngine, NativeEngine, ZbarEngine};
use crate::traits::ScannerEngine;
use crate::types::EngineState;

/// Engine of any tier.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyScannerEngine {
    /// Platform detector.
    Native(NativeEngine),

    /// Dynamically loaded ZBar decoder.
    Zbar(ZbarEngine),

    /// Pure software QR decoder.
    Jsqr(JsqrEngine),
}

impl ScannerEngine for AnyScannerEngine {
    fn kind(&self) -> EngineKind {
        match self {
            Self::Native(engine) => engine.kind(),
            Self::Zbar(engine) => engine.kind(),
            Self::Jsqr(engine) => engine.kind(),
        }
    }

    fn state(&self) -> EngineState {
        match self {
            Self::Native(engine) => engine.state(),
            Self::Zbar(engine) => engine.state(),
            Self::Jsqr(engine) => engine.state(),
        }
    }

    async fn is_supported(&self) -> bool {
        match self {
            Self::Native(engine) => engine.is_supported().await,
            Self::Zbar(engine) => engine.is_supported().await,
            Self::Jsqr(engine) => engine.is_supported().await,
        }
    }

    async fn initialize(&mut self) -> Result<()> {
        match self {
            Self::Native(engine) => engine.initialize().await,
            Self::Zbar(engine) => engine.initialize().await,
            Self::Jsqr(engine) => engine.initialize().await,
        }
    }

    async fn detect(&mut self, frame: &PixelBuffer) -> Result<Vec<DetectedBarcode>> {
        match self {
            Self::Native(engine) => engine.detect(frame).await,
            Self::Zbar(engine) => engine.detect(frame).await,
            Self::Jsqr(engine) => engine.detect(frame).await,
        }
    }

    fn dispose(&mut self) {
        match self {
            Self::Native(engine) => engine.dispose(),
            Self::Zbar(engine) => engine.dispose(),
            Self::Jsqr(engine) => engine.dispose(),
        }
    }

    fn supported_formats(&self) -> Vec<String> {
        match self {
            Self::Native(engine) => engine.supported_formats(),
            Self::Zbar(engine) => engine.supported_formats(),
            Self::Jsqr(engine) => engine.supported_formats(),
        }
    }
}

impl From<NativeEngine> for AnyScannerEngine {
    fn from(engine: NativeEngine) -> Self {
        Self::Native(engine)
    }
}

impl From<ZbarEngine> for AnyScannerEngine {
    fn from(engine: ZbarEngine) -> Self {
        Self::Zbar(engine)
    }
}

impl From<JsqrEngine> for AnyScannerEngine {
    fn from(engine: JsqrEngine) -> Self {
        Self::Jsqr(engine)
    }
}
