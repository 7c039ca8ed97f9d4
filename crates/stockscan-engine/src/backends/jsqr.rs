//! Pure software tier. Always available, reads QR codes only.

use std::fmt;
use std::sync::Arc;

use stockscan_core::constants::FORMAT_QR_CODE;
use stockscan_core::{BoundingBox, DetectedBarcode, EngineKind, PixelBuffer, Point};
use stockscan_symbology::normalize;
use tracing::{debug, trace};

use crate::error::{EngineError, Result};
use crate::traits::{MatrixDecoder, MatrixHit, ScannerEngine};
use crate::types::EngineState;

/// QR decoder built on `rqrr`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl MatrixDecoder for RqrrDecoder {
    fn decode(&self, luma: &[u8], width: u32, height: u32) -> Vec<MatrixHit> {
        let (w, h) = (width as usize, height as usize);
        if luma.len() < w * h {
            return Vec::new();
        }

        let mut image = rqrr::PreparedImage::prepare_from_greyscale(w, h, |x, y| luma[y * w + x]);
        image
            .detect_grids()
            .into_iter()
            .filter_map(|grid| {
                let corners = grid
                    .bounds
                    .iter()
                    .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                    .collect();
                match grid.decode() {
                    Ok((_, data)) => Some(MatrixHit { data, corners }),
                    Err(e) => {
                        trace!(error = ?e, "QR grid found but not decodable");
                        None
                    }
                }
            })
            .collect()
    }
}

/// Software engine over a [`MatrixDecoder`].
///
/// Each frame is tried at normal polarity first, then inverted, so light
/// symbols on dark backgrounds are found too.
pub struct JsqrEngine {
    decoder: Arc<dyn MatrixDecoder>,
    state: EngineState,
}

impl JsqrEngine {
    /// Create an engine using the built-in `rqrr` decoder.
    pub fn new() -> Self {
        Self::with_decoder(Arc::new(RqrrDecoder))
    }

    /// Create an engine using a custom decoder.
    pub fn with_decoder(decoder: Arc<dyn MatrixDecoder>) -> Self {
        Self {
            decoder,
            state: EngineState::Uninitialized,
        }
    }

    fn to_barcode(hit: MatrixHit) -> DetectedBarcode {
        let format = normalize("qr", EngineKind::Jsqr);
        let mut barcode = DetectedBarcode::new(hit.data, format);
        if let Some(bbox) = BoundingBox::from_points(&hit.corners) {
            barcode = barcode.with_bounding_box(bbox);
        }
        barcode.with_corner_points(hit.corners)
    }
}

impl Default for JsqrEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for JsqrEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsqrEngine")
            .field("state", &self.state)
            .finish()
    }
}

impl ScannerEngine for JsqrEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Jsqr
    }

    fn state(&self) -> EngineState {
        self.state
    }

    async fn is_supported(&self) -> bool {
        true
    }

    async fn initialize(&mut self) -> Result<()> {
        match self.state {
            EngineState::Ready => Ok(()),
            EngineState::Disposed => Err(EngineError::disposed(self.name())),
            EngineState::Uninitialized => {
                self.state = EngineState::Ready;
                debug!("Software engine ready");
                Ok(())
            }
        }
    }

    async fn detect(&mut self, frame: &PixelBuffer) -> Result<Vec<DetectedBarcode>> {
        match self.state {
            EngineState::Ready => {}
            EngineState::Disposed => return Err(EngineError::disposed(self.name())),
            EngineState::Uninitialized => return Err(EngineError::not_initialized(self.name())),
        }

        let mut luma = frame.luma();
        let mut hits = self.decoder.decode(&luma, frame.width(), frame.height());
        if hits.is_empty() {
            luma.iter_mut().for_each(|v| *v = !*v);
            hits = self.decoder.decode(&luma, frame.width(), frame.height());
        }

        Ok(hits.into_iter().map(Self::to_barcode).collect())
    }

    fn dispose(&mut self) {
        self.state = EngineState::Disposed;
    }

    fn supported_formats(&self) -> Vec<String> {
        vec![FORMAT_QR_CODE.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockMatrixDecoder;

    #[tokio::test]
    async fn test_always_supported_and_qr_only() {
        let engine = JsqrEngine::new();
        assert!(engine.is_supported().await);
        assert_eq!(engine.supported_formats(), vec![FORMAT_QR_CODE]);
        assert!(!engine.supports_1d());
    }

    #[tokio::test]
    async fn test_blank_frame_finds_nothing() {
        let mut engine = JsqrEngine::new();
        engine.initialize().await.unwrap();

        let frame = PixelBuffer::from_luma(64, 64, &[0xFF; 64 * 64]).unwrap();
        assert!(engine.detect(&frame).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retries_inverted_when_normal_finds_nothing() {
        let decoder = Arc::new(MockMatrixDecoder::new());
        decoder.push_hits(Vec::new());
        decoder.push_hits(vec![MatrixHit {
            data: "https://example.test/item/42".into(),
            corners: vec![
                Point::new(0.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(20.0, 20.0),
                Point::new(0.0, 20.0),
            ],
        }]);

        let mut engine = JsqrEngine::with_decoder(decoder.clone());
        engine.initialize().await.unwrap();

        let frame = PixelBuffer::from_luma(2, 1, &[0x00, 0xF0]).unwrap();
        let found = engine.detect(&frame).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].format, FORMAT_QR_CODE);
        assert_eq!(
            found[0].bounding_box,
            Some(BoundingBox::new(0.0, 0.0, 20.0, 20.0))
        );
        assert_eq!(decoder.seen_luma(), vec![vec![0x00, 0xF0], vec![0xFF, 0x0F]]);
    }

    #[tokio::test]
    async fn test_no_inverted_pass_after_normal_hit() {
        let decoder = Arc::new(MockMatrixDecoder::new());
        decoder.push_hits(vec![MatrixHit {
            data: "A1".into(),
            corners: Vec::new(),
        }]);

        let mut engine = JsqrEngine::with_decoder(decoder.clone());
        engine.initialize().await.unwrap();

        let frame = PixelBuffer::from_luma(1, 1, &[0x10]).unwrap();
        let found = engine.detect(&frame).await.unwrap();
        assert_eq!(found[0].raw_value, "A1");
        assert_eq!(found[0].bounding_box, None);
        assert_eq!(decoder.seen_luma().len(), 1);
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let mut engine = JsqrEngine::new();
        let frame = PixelBuffer::from_luma(1, 1, &[0]).unwrap();

        assert!(engine.detect(&frame).await.is_err());
        engine.initialize().await.unwrap();
        engine.dispose();
        engine.dispose();
        assert!(matches!(
            engine.detect(&frame).await,
            Err(EngineError::Disposed { .. })
        ));
    }
}
