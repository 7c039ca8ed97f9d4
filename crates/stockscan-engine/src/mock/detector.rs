//! Mock platform barcode detector.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::future::{self, BoxFuture, FutureExt};
use stockscan_core::PixelBuffer;

use super::lock;
use crate::error::{EngineError, Result};
use crate::traits::{NativeDetection, NativeDetector};

#[derive(Debug, Default)]
struct DetectorState {
    queued: VecDeque<std::result::Result<Vec<NativeDetection>, String>>,
    configured: Option<Vec<String>>,
    detect_calls: usize,
}

/// Simulated platform detector.
///
/// Each `detect` call pops the next queued outcome from its
/// [`MockNativeHandle`]; an empty queue means "nothing in this frame".
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use stockscan_engine::backends::NativeEngine;
/// use stockscan_engine::mock::MockNativeDetector;
/// use stockscan_engine::traits::{NativeDetection, ScannerEngine};
/// use stockscan_core::PixelBuffer;
///
/// #[tokio::main]
/// async fn main() -> stockscan_engine::Result<()> {
///     let (detector, handle) = MockNativeDetector::new(&["qr_code", "ean_13"]);
///     let mut engine = NativeEngine::new(Some(Arc::new(detector)), vec![]);
///     engine.initialize().await?;
///
///     handle.push_detections(vec![NativeDetection {
///         raw_value: "ABC-123".into(),
///         format: "qr_code".into(),
///         corner_points: vec![],
///     }]);
///
///     let frame = PixelBuffer::from_luma(1, 1, &[0]).unwrap();
///     let found = engine.detect(&frame).await?;
///     assert_eq!(found[0].format, "QR_CODE");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockNativeDetector {
    formats: Vec<String>,
    configure_failure: Option<String>,
    state: Arc<Mutex<DetectorState>>,
}

impl MockNativeDetector {
    /// Create a detector supporting the given platform format names.
    pub fn new(formats: &[&str]) -> (Self, MockNativeHandle) {
        let state = Arc::new(Mutex::new(DetectorState::default()));
        let detector = Self {
            formats: formats.iter().map(|f| f.to_string()).collect(),
            configure_failure: None,
            state: Arc::clone(&state),
        };
        (detector, MockNativeHandle { state })
    }

    /// Make `configure` fail, as a platform whose detector constructor throws.
    pub fn with_configure_failure(mut self, message: impl Into<String>) -> Self {
        self.configure_failure = Some(message.into());
        self
    }
}

impl NativeDetector for MockNativeDetector {
    fn supported_formats(&self) -> BoxFuture<'_, Result<Vec<String>>> {
        future::ready(Ok(self.formats.clone())).boxed()
    }

    fn configure(&self, formats: &[String]) -> Result<()> {
        if let Some(message) = &self.configure_failure {
            return Err(EngineError::initialization_failed(message.clone()));
        }
        lock(&self.state).configured = Some(formats.to_vec());
        Ok(())
    }

    fn detect<'a>(
        &'a self,
        _frame: &'a PixelBuffer,
    ) -> BoxFuture<'a, Result<Vec<NativeDetection>>> {
        let outcome = {
            let mut state = lock(&self.state);
            state.detect_calls += 1;
            state.queued.pop_front().unwrap_or(Ok(Vec::new()))
        };
        future::ready(outcome.map_err(EngineError::detection)).boxed()
    }
}

/// Handle for scripting a [`MockNativeDetector`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MockNativeHandle {
    state: Arc<Mutex<DetectorState>>,
}

impl MockNativeHandle {
    /// Queue the symbols the next `detect` call reports.
    pub fn push_detections(&self, detections: Vec<NativeDetection>) {
        lock(&self.state).queued.push_back(Ok(detections));
    }

    /// Make the next `detect` call fail.
    pub fn fail_next_detect(&self, message: impl Into<String>) {
        lock(&self.state).queued.push_back(Err(message.into()));
    }

    /// Platform format names the detector was configured with.
    pub fn configured_formats(&self) -> Option<Vec<String>> {
        lock(&self.state).configured.clone()
    }

    /// Number of `detect` calls so far.
    pub fn detect_calls(&self) -> usize {
        lock(&self.state).detect_calls
    }
}
