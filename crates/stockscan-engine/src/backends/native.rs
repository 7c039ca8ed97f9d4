//! Platform detector tier.

use std::fmt;
use std::sync::Arc;

use stockscan_core::constants::{FORMAT_EAN_13, FORMAT_QR_CODE};
use stockscan_core::{BoundingBox, DetectedBarcode, EngineKind, PixelBuffer};
use stockscan_symbology::normalize;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::traits::{NativeDetector, ScannerEngine};
use crate::types::EngineState;

/// Formats the platform detector must cover before the tier is considered
/// usable.
pub fn default_required_formats() -> Vec<String> {
    vec![FORMAT_QR_CODE.to_string(), FORMAT_EAN_13.to_string()]
}

/// Engine backed by the platform's own barcode detector.
pub struct NativeEngine {
    detector: Option<Arc<dyn NativeDetector>>,
    required_formats: Vec<String>,
    formats: Vec<String>,
    state: EngineState,
}

impl NativeEngine {
    /// Create an engine over an optional platform detector.
    ///
    /// `required_formats` are canonical names; the tier reports itself as
    /// unsupported unless the detector covers all of them.
    pub fn new(detector: Option<Arc<dyn NativeDetector>>, required_formats: Vec<String>) -> Self {
        Self {
            detector,
            required_formats,
            formats: Vec::new(),
            state: EngineState::Uninitialized,
        }
    }

    /// Platform format names mapped to canonical names, deduplicated.
    async fn query_formats(detector: &dyn NativeDetector) -> Result<Vec<(String, String)>> {
        let native = detector.supported_formats().await?;
        let mut pairs: Vec<(String, String)> = Vec::with_capacity(native.len());
        for name in native {
            let canonical = normalize(&name, EngineKind::Native);
            if !pairs.iter().any(|(_, c)| *c == canonical) {
                pairs.push((name, canonical));
            }
        }
        Ok(pairs)
    }
}

impl fmt::Debug for NativeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeEngine")
            .field("has_detector", &self.detector.is_some())
            .field("required_formats", &self.required_formats)
            .field("formats", &self.formats)
            .field("state", &self.state)
            .finish()
    }
}

impl ScannerEngine for NativeEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Native
    }

    fn state(&self) -> EngineState {
        self.state
    }

    async fn is_supported(&self) -> bool {
        let Some(detector) = self.detector.as_deref() else {
            return false;
        };

        match Self::query_formats(detector).await {
            Ok(pairs) => self
                .required_formats
                .iter()
                .all(|required| pairs.iter().any(|(_, c)| c == required)),
            Err(e) => {
                debug!(error = %e, "Native format query failed");
                false
            }
        }
    }

    async fn initialize(&mut self) -> Result<()> {
        match self.state {
            EngineState::Ready => return Ok(()),
            EngineState::Disposed => return Err(EngineError::disposed(self.name())),
            EngineState::Uninitialized => {}
        }

        let detector = self
            .detector
            .clone()
            .ok_or_else(|| EngineError::unsupported("Platform exposes no barcode detector"))?;

        let pairs = Self::query_formats(detector.as_ref())
            .await
            .map_err(|e| EngineError::initialization_failed(e.to_string()))?;
        if pairs.is_empty() {
            return Err(EngineError::initialization_failed(
                "Platform detector supports no formats",
            ));
        }

        let native_names: Vec<String> = pairs.iter().map(|(n, _)| n.clone()).collect();
        detector
            .configure(&native_names)
            .map_err(|e| EngineError::initialization_failed(e.to_string()))?;

        self.formats = pairs.into_iter().map(|(_, c)| c).collect();
        self.state = EngineState::Ready;
        debug!(formats = ?self.formats, "Native engine ready");
        Ok(())
    }

    async fn detect(&mut self, frame: &PixelBuffer) -> Result<Vec<DetectedBarcode>> {
        let detector = match (self.state, self.detector.as_deref()) {
            (EngineState::Ready, Some(detector)) => detector,
            (EngineState::Disposed, _) => return Err(EngineError::disposed(self.name())),
            _ => return Err(EngineError::not_initialized(self.name())),
        };

        let detections = detector.detect(frame).await.map_err(|e| {
            warn!(error = %e, "Native detector failed");
            EngineError::detection(e.to_string())
        })?;

        Ok(detections
            .into_iter()
            .map(|d| {
                let format = normalize(&d.format, EngineKind::Native);
                let mut barcode = DetectedBarcode::new(d.raw_value, format);
                if let Some(bbox) = BoundingBox::from_points(&d.corner_points) {
                    barcode = barcode.with_bounding_box(bbox);
                }
                barcode.with_corner_points(d.corner_points)
            })
            .collect())
    }

    fn dispose(&mut self) {
        if self.state != EngineState::Disposed {
            debug!("Native engine disposed");
        }
        self.detector = None;
        self.formats.clear();
        self.state = EngineState::Disposed;
    }

    fn supported_formats(&self) -> Vec<String> {
        self.formats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockNativeDetector;
    use crate::traits::NativeDetection;
    use stockscan_core::Point;

    fn frame() -> PixelBuffer {
        PixelBuffer::from_luma(2, 2, &[0; 4]).unwrap()
    }

    #[tokio::test]
    async fn test_unsupported_without_detector() {
        let mut engine = NativeEngine::new(None, default_required_formats());
        assert!(!engine.is_supported().await);
        assert!(matches!(
            engine.initialize().await,
            Err(EngineError::Unsupported { .. })
        ));
    }

    #[tokio::test]
    async fn test_unsupported_when_required_format_missing() {
        let (detector, _handle) = MockNativeDetector::new(&["qr_code", "code_128"]);
        let engine = NativeEngine::new(Some(Arc::new(detector)), default_required_formats());
        assert!(!engine.is_supported().await);
    }

    #[tokio::test]
    async fn test_initialize_normalizes_formats() {
        let (detector, _handle) = MockNativeDetector::new(&["qr_code", "ean_13", "upc_a"]);
        let mut engine = NativeEngine::new(Some(Arc::new(detector)), default_required_formats());

        assert!(engine.is_supported().await);
        assert!(engine.supported_formats().is_empty());

        engine.initialize().await.unwrap();
        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.supported_formats(), vec!["QR_CODE", "EAN_13", "UPC_A"]);
        assert!(engine.supports_1d());
    }

    #[tokio::test]
    async fn test_detect_normalizes_and_derives_bounding_box() {
        let (detector, handle) = MockNativeDetector::new(&["qr_code", "ean_13"]);
        let mut engine = NativeEngine::new(Some(Arc::new(detector)), default_required_formats());
        engine.initialize().await.unwrap();

        handle.push_detections(vec![NativeDetection {
            raw_value: "4006381333931".into(),
            format: "ean_13".into(),
            corner_points: vec![
                Point::new(10.0, 20.0),
                Point::new(110.0, 20.0),
                Point::new(110.0, 60.0),
                Point::new(10.0, 60.0),
            ],
        }]);

        let found = engine.detect(&frame()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].format, "EAN_13");
        assert_eq!(
            found[0].bounding_box,
            Some(BoundingBox::new(10.0, 20.0, 100.0, 40.0))
        );

        // Nothing queued: nothing found, not an error
        assert!(engine.detect(&frame()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detect_platform_failure_is_error() {
        let (detector, handle) = MockNativeDetector::new(&["qr_code", "ean_13"]);
        let mut engine = NativeEngine::new(Some(Arc::new(detector)), default_required_formats());
        engine.initialize().await.unwrap();

        handle.fail_next_detect("context lost");
        assert!(matches!(
            engine.detect(&frame()).await,
            Err(EngineError::Detection { .. })
        ));
    }

    #[tokio::test]
    async fn test_configure_failure_fails_initialize() {
        let (detector, _handle) = MockNativeDetector::new(&["qr_code", "ean_13"]);
        let detector = detector.with_configure_failure("constructor threw");
        let mut engine = NativeEngine::new(Some(Arc::new(detector)), default_required_formats());

        assert!(engine.is_supported().await);
        assert!(matches!(
            engine.initialize().await,
            Err(EngineError::InitializationFailed { .. })
        ));
        assert_eq!(engine.state(), EngineState::Uninitialized);
    }

    #[tokio::test]
    async fn test_lifecycle_errors() {
        let (detector, _handle) = MockNativeDetector::new(&["qr_code", "ean_13"]);
        let mut engine = NativeEngine::new(Some(Arc::new(detector)), default_required_formats());

        assert!(matches!(
            engine.detect(&frame()).await,
            Err(EngineError::NotInitialized { .. })
        ));

        engine.initialize().await.unwrap();
        engine.dispose();
        engine.dispose();

        assert_eq!(engine.state(), EngineState::Disposed);
        assert!(matches!(
            engine.detect(&frame()).await,
            Err(EngineError::Disposed { .. })
        ));
        assert!(matches!(
            engine.initialize().await,
            Err(EngineError::Disposed { .. })
        ));
    }
}
