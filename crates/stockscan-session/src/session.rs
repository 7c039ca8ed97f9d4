//! Camera scan session.
//!
//! Composes one [`CameraManager`] and one engine from the [`EngineFactory`]
//! into a caller-driven poll loop. The session owns the display surface
//! between runs so it can stop and restart (camera switching) on its own.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use stockscan_camera::{
    CameraConfig, CameraDevice, CameraErrorKind, CameraManager, MediaDevices, MediaStream,
    VideoSurface,
};
use stockscan_core::constants::{SCAN_VIBRATION_MS, VIDEO_READY_POLL_MS};
use stockscan_core::{EngineKind, ScanFeedback, ScanResult, SilentFeedback};
use stockscan_engine::{AnyScannerEngine, EngineFactory, ScannerEngine};
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::state::SessionState;

/// Capacity of the scan event channel.
const EVENT_CAPACITY: usize = 16;

/// Null frames between two capture diagnostics.
const NULL_FRAME_LOG_EVERY: u64 = 100;

/// Cancels a session from outside while it is starting or polling.
///
/// Cheap to clone; every clone targets the same session.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    /// Request the session to stop at its next checkpoint.
    pub fn stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}

/// A camera-based scanning session.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use stockscan_camera::mock::{MockMediaDevices, MockSurface};
/// use stockscan_core::PixelBuffer;
/// use stockscan_engine::mock::MockPlatform;
/// use stockscan_engine::{EngineFactory, FactoryConfig, LinearSymbol};
/// use stockscan_session::{ScanSession, SessionConfig};
///
/// #[tokio::main]
/// async fn main() -> stockscan_session::Result<()> {
///     let platform = MockPlatform::builder().zbar().build();
///     let decoder = platform.zbar_decoder().unwrap();
///     let factory = EngineFactory::new(Arc::new(platform), FactoryConfig::default());
///
///     let (media, camera) = MockMediaDevices::new();
///     camera.add_camera("cam-1", "Back Camera");
///
///     camera.produce_frame(PixelBuffer::from_luma(2, 2, &[0; 4]).unwrap());
///
///     let mut session =
///         ScanSession::new(factory, media, MockSurface::new(), SessionConfig::default());
///     session.start().await?;
///     assert_eq!(session.engine_name(), Some("zbar-tier"));
///
///     decoder.push_symbols(vec![LinearSymbol {
///         type_name: "ZBAR_EAN13".into(),
///         data: "4006381333931".into(),
///         points: Vec::new(),
///     }]);
///
///     let scan = session.poll_once().await.unwrap();
///     assert_eq!(scan.code(), "4006381333931");
///     assert_eq!(scan.format(), "EAN_13");
///
///     session.stop().await;
///     Ok(())
/// }
/// ```
pub struct ScanSession<M, V>
where
    M: MediaDevices,
    V: VideoSurface<M::Stream>,
{
    id: Uuid,
    config: SessionConfig,
    factory: EngineFactory,
    camera: CameraManager<M, V>,
    surface: Option<V>,
    engine: Option<AnyScannerEngine>,
    state: SessionState,
    error: Option<String>,
    has_permission: Option<bool>,
    cameras: Vec<CameraDevice>,
    current_camera: Option<String>,
    has_torch: bool,
    torch_on: bool,
    last_scan: Option<ScanResult>,
    last_emit: Option<Instant>,
    frames: u64,
    null_frames: u64,
    events: broadcast::Sender<ScanResult>,
    feedback: Arc<dyn ScanFeedback>,
    stop: StopHandle,
}

impl<M, V> ScanSession<M, V>
where
    M: MediaDevices,
    V: VideoSurface<M::Stream>,
{
    pub fn new(factory: EngineFactory, media: M, surface: V, config: SessionConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            id: Uuid::new_v4(),
            config,
            factory,
            camera: CameraManager::new(media),
            surface: Some(surface),
            engine: None,
            state: SessionState::Idle,
            error: None,
            has_permission: None,
            cameras: Vec::new(),
            current_camera: None,
            has_torch: false,
            torch_on: false,
            last_scan: None,
            last_emit: None,
            frames: 0,
            null_frames: 0,
            events,
            feedback: Arc::new(SilentFeedback),
            stop: StopHandle::default(),
        }
    }

    /// Vibrate and beep through `feedback` on every reported scan.
    pub fn with_feedback(mut self, feedback: Arc<dyn ScanFeedback>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Enumerate cameras ahead of `start` and preselect the best one.
    ///
    /// An empty list marks permission as not granted.
    pub async fn refresh_cameras(&mut self) -> &[CameraDevice] {
        let cameras = self.camera.enumerate_cameras().await;
        self.has_permission = Some(!cameras.is_empty());
        self.select_camera(cameras);
        &self.cameras
    }

    /// Acquire an engine and a camera stream and begin scanning.
    ///
    /// On failure every acquired resource is released and the error is
    /// kept as a user-facing message in [`error`](Self::error). An abort
    /// through the [`StopHandle`] is not recorded.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AlreadyRunning`] while initializing or scanning
    /// - [`SessionError::VideoTimeout`] if the surface never shows a frame
    /// - [`SessionError::Aborted`] if a stop was requested meanwhile
    /// - engine or camera errors from acquisition
    pub async fn start(&mut self) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyRunning { state: self.state });
        }

        self.transition(SessionState::Initializing);
        self.error = None;
        self.stop.reset();

        match self.acquire().await {
            Ok(()) => {
                self.transition(SessionState::Scanning);
                info!(
                    session = %self.id,
                    engine = self.engine_name().unwrap_or("none"),
                    device = self.current_camera.as_deref().unwrap_or("default"),
                    "Scan session started"
                );
                Ok(())
            }
            Err(e) => {
                self.release();
                self.transition(SessionState::Idle);

                if matches!(e, SessionError::Aborted) {
                    debug!(session = %self.id, "Scan session start aborted");
                } else {
                    if let SessionError::Camera(camera) = &e
                        && camera.kind() == CameraErrorKind::Permission
                    {
                        self.has_permission = Some(false);
                    }
                    warn!(session = %self.id, error = %e, "Scan session failed to start");
                    self.error = Some(e.user_message());
                }
                Err(e)
            }
        }
    }

    async fn acquire(&mut self) -> Result<()> {
        let engine = self
            .factory
            .create_engine(self.config.preferred_engine)
            .await?;
        debug!(engine = engine.name(), "Engine created");
        self.engine = Some(engine);
        self.checkpoint()?;

        // An empty list hides the cause; the stream request below classifies it.
        let cameras = self.camera.enumerate_cameras().await;
        self.select_camera(cameras);

        let config = CameraConfig {
            device_id: self.current_camera.clone(),
            ..self.config.camera.clone()
        };
        let device = self.camera.start_stream(&config).await?.device_id().to_string();
        self.current_camera = Some(device);
        self.has_permission = Some(true);
        self.checkpoint()?;

        let surface = self.surface.take().ok_or(SessionError::NoSurface)?;
        self.camera.bind_to_video(surface)?;
        self.wait_for_video().await?;
        self.checkpoint()?;

        self.has_torch = self.camera.has_torch();
        self.torch_on = false;
        if self.has_torch {
            debug!("Torch available");
        }
        self.frames = 0;
        self.null_frames = 0;
        Ok(())
    }

    /// Poll the bound surface until it shows a frame, a stop is requested,
    /// or the configured timeout passes.
    async fn wait_for_video(&self) -> Result<()> {
        let timeout = self.config.video_ready_timeout();
        let ready = async {
            while !self.camera.is_video_ready() && !self.stop.is_requested() {
                time::sleep(Duration::from_millis(VIDEO_READY_POLL_MS)).await;
            }
        };

        match time::timeout(timeout, ready).await {
            Ok(()) => {
                debug!(dimensions = ?self.camera.video_dimensions(), "Video ready");
                Ok(())
            }
            Err(_) => Err(SessionError::VideoTimeout {
                timeout_ms: self.config.video_ready_timeout_ms,
            }),
        }
    }

    fn checkpoint(&self) -> Result<()> {
        if self.stop.is_requested() {
            Err(SessionError::Aborted)
        } else {
            Ok(())
        }
    }

    /// Keep the current camera when it is still present, then the
    /// configured one, else pick the best.
    fn select_camera(&mut self, cameras: Vec<CameraDevice>) {
        let present = |id: &String| cameras.iter().any(|c| &c.id == id);
        let chosen = self
            .current_camera
            .clone()
            .filter(present)
            .or_else(|| self.config.camera.device_id.clone().filter(present))
            .or_else(|| stockscan_camera::pick_best_camera(cameras.clone()).map(|c| c.id));

        self.current_camera = chosen;
        self.cameras = cameras;
    }

    /// Capture one frame and run detection on it.
    ///
    /// Returns the first barcode of the frame unless the session is not
    /// scanning, no frame was available, detection failed or found nothing,
    /// or the debounce window since the last reported scan is still open.
    pub async fn poll_once(&mut self) -> Option<ScanResult> {
        if self.state != SessionState::Scanning {
            return None;
        }
        let engine = self.engine.as_mut()?;

        let Some(frame) = self.camera.capture_frame() else {
            self.null_frames += 1;
            if self.null_frames == 1 || self.null_frames % NULL_FRAME_LOG_EVERY == 0 {
                warn!(
                    null_frames = self.null_frames,
                    reason = ?self.camera.last_capture_failure(),
                    "Frame capture failed"
                );
            }
            return None;
        };

        self.frames += 1;
        if self.frames == 1 {
            debug!(
                width = frame.width(),
                height = frame.height(),
                engine = engine.name(),
                "First frame captured"
            );
        }

        let detected = match engine.detect(&frame).await {
            Ok(detected) => detected,
            Err(e) => {
                trace!(error = %e, "Detection failed, skipping frame");
                return None;
            }
        };
        let first = detected.into_iter().next()?;

        let now = Instant::now();
        if let Some(last) = self.last_emit
            && now.duration_since(last) < self.config.debounce()
        {
            trace!(code = %first.raw_value, "Scan debounced");
            return None;
        }

        let scan = match ScanResult::new(first.raw_value, first.format) {
            Ok(scan) => scan,
            Err(e) => {
                debug!(error = %e, "Discarding detection");
                return None;
            }
        };

        self.last_emit = Some(now);
        self.last_scan = Some(scan.clone());
        info!(code = scan.code(), format = scan.format(), "Barcode scanned");
        self.feedback.vibrate(SCAN_VIBRATION_MS);
        self.feedback.beep();
        // No subscribers is fine.
        let _ = self.events.send(scan.clone());
        Some(scan)
    }

    /// Poll at the configured frame rate until a barcode is reported.
    ///
    /// Returns `None` once the session is no longer scanning. A stop
    /// requested through the [`StopHandle`] stops the session first.
    pub async fn next_scan(&mut self) -> Option<ScanResult> {
        let mut ticker = time::interval(self.config.frame_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if self.stop.is_requested() {
                self.stop().await;
                return None;
            }
            if self.state != SessionState::Scanning {
                return None;
            }
            if let Some(scan) = self.poll_once().await {
                return Some(scan);
            }
        }
    }

    /// Stop scanning and release the camera and engine.
    ///
    /// Safe to call in any state.
    pub async fn stop(&mut self) {
        if self.torch_on {
            self.camera.set_torch(false).await;
        }
        self.release();

        if self.state == SessionState::Scanning {
            self.transition(SessionState::Idle);
            info!(session = %self.id, frames = self.frames, "Scan session stopped");
        }
    }

    fn release(&mut self) {
        if let Some(surface) = self.camera.stop_stream() {
            self.surface = Some(surface);
        }
        if let Some(mut engine) = self.engine.take() {
            debug!(engine = engine.name(), "Disposing engine");
            engine.dispose();
        }
        self.has_torch = false;
        self.torch_on = false;
    }

    /// Move to the next available camera, restarting the stream if scanning.
    ///
    /// Does nothing with fewer than two cameras.
    ///
    /// # Errors
    ///
    /// Returns the restart error, if scanning and the restart fails.
    pub async fn switch_camera(&mut self) -> Result<()> {
        if self.cameras.len() <= 1 {
            return Ok(());
        }

        let current = self
            .current_camera
            .as_ref()
            .and_then(|id| self.cameras.iter().position(|c| &c.id == id));
        let next = current.map_or(0, |index| (index + 1) % self.cameras.len());
        let next_id = self.cameras[next].id.clone();
        info!(from = ?self.current_camera, to = %next_id, "Switching camera");
        self.current_camera = Some(next_id);

        if self.state == SessionState::Scanning {
            self.stop().await;
            time::sleep(self.config.settle_delay()).await;
            self.start().await?;
        }
        Ok(())
    }

    /// Flip the torch. Returns the torch state afterwards.
    ///
    /// Without torch capability, or when the platform rejects the change,
    /// the state is left as it was.
    pub async fn toggle_torch(&mut self) -> bool {
        if self.state != SessionState::Scanning || !self.has_torch {
            return self.torch_on;
        }

        let wanted = !self.torch_on;
        if self.camera.set_torch(wanted).await {
            self.torch_on = wanted;
            debug!(on = wanted, "Torch toggled");
        }
        self.torch_on
    }

    /// Forget the last scan and reopen the debounce window immediately.
    pub fn clear_last_scan(&mut self) {
        self.last_scan = None;
        self.last_emit = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Subscribe to reported scans.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanResult> {
        self.events.subscribe()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_scanning(&self) -> bool {
        self.state == SessionState::Scanning
    }

    pub fn is_initializing(&self) -> bool {
        self.state == SessionState::Initializing
    }

    /// User-facing message of the last start failure.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `None` until cameras have been enumerated once.
    pub fn has_permission(&self) -> Option<bool> {
        self.has_permission
    }

    pub fn last_scan(&self) -> Option<&ScanResult> {
        self.last_scan.as_ref()
    }

    pub fn engine_kind(&self) -> Option<EngineKind> {
        self.engine.as_ref().map(|engine| engine.kind())
    }

    /// Tier id of the running engine.
    pub fn engine_name(&self) -> Option<&'static str> {
        self.engine.as_ref().map(|engine| engine.name())
    }

    /// Whether the running engine reads linear barcodes.
    pub fn supports_1d(&self) -> bool {
        self.engine
            .as_ref()
            .is_some_and(|engine| engine.supports_1d())
    }

    pub fn available_cameras(&self) -> &[CameraDevice] {
        &self.cameras
    }

    pub fn current_camera(&self) -> Option<&str> {
        self.current_camera.as_deref()
    }

    pub fn has_torch(&self) -> bool {
        self.has_torch
    }

    pub fn is_torch_on(&self) -> bool {
        self.torch_on
    }

    /// Frames captured since the last start.
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    /// Polls since the last start that found no frame.
    pub fn null_frames(&self) -> u64 {
        self.null_frames
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "invalid session transition {} -> {}",
            self.state,
            next
        );
        debug!(session = %self.id, from = %self.state, to = %next, "Session state change");
        self.state = next;
    }
}

impl<M, V> Drop for ScanSession<M, V>
where
    M: MediaDevices,
    V: VideoSurface<M::Stream>,
{
    fn drop(&mut self) {
        self.release();
    }
}

impl<M, V> fmt::Debug for ScanSession<M, V>
where
    M: MediaDevices,
    V: VideoSurface<M::Stream>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("engine", &self.engine_name())
            .field("camera", &self.current_camera)
            .field("error", &self.error)
            .finish()
    }
}
