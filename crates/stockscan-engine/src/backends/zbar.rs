//! ZBar tier: a dynamically loaded decoder strong on retail linear codes.
//!
//! The decoder payload is expensive to fetch, so it lives in a
//! [`ZbarPayload`] shared between every ZBar engine built by one factory and
//! the factory's background preload. Concurrent first uses collapse into a
//! single load. A failed load leaves the payload unloaded so the next caller
//! can retry.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use stockscan_core::constants::*;
use stockscan_core::{BoundingBox, DetectedBarcode, EngineKind, PixelBuffer};
use stockscan_symbology::normalize;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::{EngineError, Result};
use crate::traits::{LinearDecoder, PayloadLoader, ScannerEngine};
use crate::types::{EngineState, PayloadState};

/// Canonical formats the ZBar decoder reads.
const ZBAR_SUPPORTED: &[&str] = &[
    FORMAT_EAN_13,
    FORMAT_EAN_8,
    FORMAT_UPC_A,
    FORMAT_UPC_E,
    FORMAT_ISBN_10,
    FORMAT_ISBN_13,
    FORMAT_CODE_128,
    FORMAT_CODE_39,
    FORMAT_CODE_93,
    FORMAT_CODABAR,
    FORMAT_ITF,
    FORMAT_DATABAR,
    FORMAT_DATABAR_EXP,
    FORMAT_QR_CODE,
];

const UNLOADED: u8 = 0;
const LOADING: u8 = 1;
const READY: u8 = 2;

/// Lazily loaded, shared ZBar decoder.
pub struct ZbarPayload {
    loader: Arc<dyn PayloadLoader>,
    decoder: OnceCell<Arc<dyn LinearDecoder>>,
    state: AtomicU8,
}

impl ZbarPayload {
    pub fn new(loader: Arc<dyn PayloadLoader>) -> Self {
        Self {
            loader,
            decoder: OnceCell::new(),
            state: AtomicU8::new(UNLOADED),
        }
    }

    /// Current load state.
    pub fn state(&self) -> PayloadState {
        match self.state.load(Ordering::Acquire) {
            READY => PayloadState::Ready,
            LOADING => PayloadState::Loading,
            _ => PayloadState::Unloaded,
        }
    }

    /// Return the decoder, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PayloadLoad`] if the loader fails. The payload
    /// stays unloaded and a later call tries again.
    pub async fn get(&self) -> Result<Arc<dyn LinearDecoder>> {
        let decoder = self
            .decoder
            .get_or_try_init(|| async {
                self.state.store(LOADING, Ordering::Release);
                info!("Loading ZBar decoder payload");
                match self.loader.load().await {
                    Ok(decoder) => {
                        self.state.store(READY, Ordering::Release);
                        info!("ZBar decoder payload ready");
                        Ok(decoder)
                    }
                    Err(e) => {
                        self.state.store(UNLOADED, Ordering::Release);
                        warn!(error = %e, "ZBar decoder payload failed to load");
                        Err(match e {
                            EngineError::PayloadLoad { .. } => e,
                            other => EngineError::payload_load(other.to_string()),
                        })
                    }
                }
            })
            .await?;
        Ok(Arc::clone(decoder))
    }
}

impl fmt::Debug for ZbarPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZbarPayload")
            .field("state", &self.state())
            .finish()
    }
}

/// Engine backed by the shared ZBar payload.
pub struct ZbarEngine {
    payload: Option<Arc<ZbarPayload>>,
    decoder: Option<Arc<dyn LinearDecoder>>,
    state: EngineState,
}

impl ZbarEngine {
    /// Create an engine over the shared payload, or `None` if the runtime
    /// cannot host the decoder.
    pub fn new(payload: Option<Arc<ZbarPayload>>) -> Self {
        Self {
            payload,
            decoder: None,
            state: EngineState::Uninitialized,
        }
    }
}

impl fmt::Debug for ZbarEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZbarEngine")
            .field("payload", &self.payload)
            .field("state", &self.state)
            .finish()
    }
}

impl ScannerEngine for ZbarEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Zbar
    }

    fn state(&self) -> EngineState {
        self.state
    }

    async fn is_supported(&self) -> bool {
        self.payload.is_some()
    }

    async fn initialize(&mut self) -> Result<()> {
        match self.state {
            EngineState::Ready => return Ok(()),
            EngineState::Disposed => return Err(EngineError::disposed(self.name())),
            EngineState::Uninitialized => {}
        }

        let payload = self
            .payload
            .as_ref()
            .ok_or_else(|| EngineError::unsupported("Runtime cannot host the ZBar decoder"))?;

        self.decoder = Some(payload.get().await?);
        self.state = EngineState::Ready;
        debug!("ZBar engine ready");
        Ok(())
    }

    async fn detect(&mut self, frame: &PixelBuffer) -> Result<Vec<DetectedBarcode>> {
        let decoder = match (self.state, self.decoder.as_deref()) {
            (EngineState::Ready, Some(decoder)) => decoder,
            (EngineState::Disposed, _) => return Err(EngineError::disposed(self.name())),
            _ => return Err(EngineError::not_initialized(self.name())),
        };

        let luma = frame.luma();
        let symbols = decoder.scan_grayscale(&luma, frame.width(), frame.height())?;

        Ok(symbols
            .into_iter()
            .map(|symbol| {
                let format = normalize(&symbol.type_name, EngineKind::Zbar);
                let mut barcode = DetectedBarcode::new(symbol.data, format);
                if let Some(bbox) = BoundingBox::from_points(&symbol.points) {
                    barcode = barcode.with_bounding_box(bbox);
                }
                barcode.with_corner_points(symbol.points)
            })
            .collect())
    }

    fn dispose(&mut self) {
        if self.state != EngineState::Disposed {
            debug!("ZBar engine disposed");
        }
        // The payload itself stays cached for the next engine
        self.decoder = None;
        self.state = EngineState::Disposed;
    }

    fn supported_formats(&self) -> Vec<String> {
        ZBAR_SUPPORTED.iter().map(|f| f.to_string()).collect()
    }
}
