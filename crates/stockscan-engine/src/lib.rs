//! Barcode detection engines for the stockscan pipeline.
//!
//! Three backend tiers sit behind one [`ScannerEngine`] contract:
//!
//! | Tier | Engine | Availability | Reads |
//! |------|--------|--------------|-------|
//! | `native-tier` | [`NativeEngine`] | platform detector present | whatever the platform reports |
//! | `zbar-tier` | [`ZbarEngine`] | runtime can host the ZBar payload | retail linear codes and QR |
//! | `jsqr-tier` | [`JsqrEngine`] | always | QR only |
//!
//! [`EngineFactory`] queries the host [`Platform`], walks the tiers best
//! first and falls back on any initialization failure, so a caller always
//! gets a working engine. Every backend reports canonical format names (see
//! `stockscan_symbology::normalize`), so callers never branch on which tier
//! decoded a symbol.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use stockscan_engine::{EngineFactory, FactoryConfig};
//! use stockscan_engine::mock::MockPlatform;
//! use stockscan_engine::traits::ScannerEngine;
//!
//! #[tokio::main]
//! async fn main() -> stockscan_engine::Result<()> {
//!     let platform = MockPlatform::builder().zbar().build();
//!     let factory = EngineFactory::new(Arc::new(platform), FactoryConfig::default());
//!
//!     let mut engine = factory.create_engine(None).await?;
//!     assert_eq!(engine.name(), "zbar-tier");
//!     assert!(engine.supports_1d());
//!
//!     engine.dispose();
//!     Ok(())
//! }
//! ```

pub mod backends;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod factory;
pub mod mock;
pub mod traits;
pub mod types;

pub use backends::{JsqrEngine, NativeEngine, ZbarEngine, ZbarPayload};
pub use config::FactoryConfig;
pub use dispatch::AnyScannerEngine;
pub use error::{EngineError, Result};
pub use factory::EngineFactory;
pub use traits::{
    LinearDecoder, LinearSymbol, MatrixDecoder, MatrixHit, NativeDetection, NativeDetector,
    PayloadLoader, Platform, ScannerEngine,
};
pub use types::{EngineCapabilities, EngineState, PayloadState};
