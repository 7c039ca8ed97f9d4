//! Camera stream ownership and frame capture.
//!
//! The manager holds at most one stream, one bound surface and one capture
//! canvas. Starting a stream always releases the previous one first.
//!
//! # Examples
//!
//! ```
//! use stockscan_camera::{CameraConfig, CameraManager};
//! use stockscan_camera::mock::{MockMediaDevices, MockSurface};
//! use stockscan_core::PixelBuffer;
//!
//! #[tokio::main]
//! async fn main() -> stockscan_camera::Result<()> {
//!     let (media, handle) = MockMediaDevices::new();
//!     handle.add_camera("cam-back", "Back Camera");
//!
//!     let mut manager: CameraManager<_, MockSurface> = CameraManager::new(media);
//!     let camera = manager.find_best_camera().await.unwrap();
//!
//!     manager.start_stream(&CameraConfig::default().with_device(camera.id)).await?;
//!     manager.bind_to_video(MockSurface::new())?;
//!     assert!(manager.capture_frame().is_none());
//!
//!     handle.produce_frame(PixelBuffer::from_luma(4, 2, &[0; 8]).unwrap());
//!     let frame = manager.capture_frame().unwrap();
//!     assert_eq!((frame.width(), frame.height()), (4, 2));
//!
//!     manager.stop_stream();
//!     Ok(())
//! }
//! ```

use std::fmt;

use stockscan_core::PixelBuffer;
use tracing::{debug, info, warn};

use crate::canvas::FrameCanvas;
use crate::error::{CameraError, Result};
use crate::traits::{MediaDevices, MediaStream, VideoSurface};
use crate::types::{
    CameraConfig, CameraDevice, CaptureFailure, DeviceTarget, Facing, MediaDeviceKind, ReadyState,
    VideoConstraints,
};

/// Owns the active camera stream and the frame capture path.
pub struct CameraManager<M, V>
where
    M: MediaDevices,
    V: VideoSurface<M::Stream>,
{
    media: M,
    stream: Option<M::Stream>,
    surface: Option<V>,
    canvas: Option<FrameCanvas>,
    last_failure: Option<CaptureFailure>,
}

impl<M, V> CameraManager<M, V>
where
    M: MediaDevices,
    V: VideoSurface<M::Stream>,
{
    pub fn new(media: M) -> Self {
        Self {
            media,
            stream: None,
            surface: None,
            canvas: None,
            last_failure: None,
        }
    }

    /// List video input devices.
    ///
    /// Opens a short-lived stream first so the platform populates device
    /// labels. Any failure is logged and yields an empty list.
    pub async fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        match self.try_enumerate().await {
            Ok(cameras) => {
                debug!(count = cameras.len(), "Cameras enumerated");
                cameras
            }
            Err(e) => {
                warn!(error = %e, "Camera enumeration failed");
                Vec::new()
            }
        }
    }

    async fn try_enumerate(&self) -> Result<Vec<CameraDevice>> {
        let mut grant = self
            .media
            .get_user_media(&VideoConstraints::permission_request())
            .await?;
        let devices = self.media.enumerate_devices().await;
        grant.stop();

        Ok(devices?
            .iter()
            .filter(|info| info.kind == MediaDeviceKind::VideoInput)
            .map(CameraDevice::from_info)
            .collect())
    }

    /// The rear-facing camera if there is one, else the first camera.
    pub async fn find_best_camera(&self) -> Option<CameraDevice> {
        pick_best_camera(self.enumerate_cameras().await)
    }

    /// Open a stream, releasing any current one first.
    ///
    /// If a specific device was requested and cannot be opened, one retry
    /// is made without the device constraint.
    ///
    /// # Errors
    ///
    /// Returns the platform error, classified, if no stream could be opened.
    pub async fn start_stream(&mut self, config: &CameraConfig) -> Result<&M::Stream> {
        self.stop_stream();

        let constraints = VideoConstraints::from_config(config);
        let stream = match self.media.get_user_media(&constraints).await {
            Ok(stream) => stream,
            Err(e) if matches!(constraints.target, DeviceTarget::Exact(_)) => {
                warn!(
                    error = %e,
                    device = ?config.device_id,
                    "Requested camera failed, trying default"
                );
                let fallback = VideoConstraints {
                    target: DeviceTarget::Facing(config.facing),
                    ..constraints
                };
                self.media.get_user_media(&fallback).await?
            }
            Err(e) => return Err(e),
        };

        info!(device = stream.device_id(), "Camera stream started");
        Ok(self.stream.insert(stream))
    }

    /// Bind the running stream to a display surface and allocate the
    /// capture canvas.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::NoStream`] if no stream is running.
    pub fn bind_to_video(&mut self, mut surface: V) -> Result<()> {
        let stream = self.stream.as_ref().ok_or(CameraError::NoStream)?;

        if let Some(mut previous) = self.surface.take() {
            previous.detach();
        }
        surface.attach(stream);
        self.surface = Some(surface);
        self.canvas = Some(FrameCanvas::new());
        self.last_failure = None;
        Ok(())
    }

    /// Grab the current frame.
    ///
    /// Returns `None` while no surface is bound, before the surface has a
    /// frame, or while it reports zero dimensions. The reason is kept in
    /// [`last_capture_failure`](Self::last_capture_failure).
    pub fn capture_frame(&mut self) -> Option<PixelBuffer> {
        let outcome = match (self.surface.as_ref(), self.canvas.as_mut()) {
            (Some(surface), Some(canvas)) => grab::<M::Stream, V>(surface, canvas),
            _ => Err(CaptureFailure::NoSurface),
        };

        match outcome {
            Ok(frame) => {
                self.last_failure = None;
                Some(frame)
            }
            Err(failure) => {
                self.last_failure = Some(failure);
                None
            }
        }
    }

    /// Why the most recent [`capture_frame`](Self::capture_frame) returned `None`.
    pub fn last_capture_failure(&self) -> Option<&CaptureFailure> {
        self.last_failure.as_ref()
    }

    /// Native dimensions of the bound surface.
    pub fn video_dimensions(&self) -> Option<(u32, u32)> {
        self.surface.as_ref().map(|surface| surface.video_size())
    }

    /// The bound surface has a current frame with non-zero dimensions.
    pub fn is_video_ready(&self) -> bool {
        self.surface.as_ref().is_some_and(|surface| {
            let (width, height) = surface.video_size();
            surface.ready_state() >= ReadyState::HaveCurrentData && width > 0 && height > 0
        })
    }

    pub fn has_torch(&self) -> bool {
        self.stream
            .as_ref()
            .is_some_and(|stream| stream.torch_capable())
    }

    /// Switch the torch. Returns whether the change was applied.
    ///
    /// Without a stream this does nothing; a platform rejection is logged.
    pub async fn set_torch(&mut self, enabled: bool) -> bool {
        let Some(stream) = self.stream.as_mut() else {
            return false;
        };

        match stream.apply_torch(enabled).await {
            Ok(()) => {
                debug!(enabled, "Torch switched");
                true
            }
            Err(e) => {
                warn!(error = %e, "Torch control failed");
                false
            }
        }
    }

    /// Stop the stream, unbind the surface and drop the canvas.
    ///
    /// Safe to call at any time, any number of times. The detached surface
    /// is handed back so it can be bound again later.
    pub fn stop_stream(&mut self) -> Option<V> {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            info!(device = stream.device_id(), "Camera stream stopped");
        }

        self.canvas = None;
        self.last_failure = None;
        self.surface.take().map(|mut surface| {
            surface.detach();
            surface
        })
    }

    pub fn is_active(&self) -> bool {
        self.stream.as_ref().is_some_and(|stream| stream.is_active())
    }

    /// Device id of the running stream.
    pub fn current_device(&self) -> Option<&str> {
        self.stream.as_ref().map(|stream| stream.device_id())
    }
}

impl<M, V> Drop for CameraManager<M, V>
where
    M: MediaDevices,
    V: VideoSurface<M::Stream>,
{
    fn drop(&mut self) {
        self.stop_stream();
    }
}

impl<M, V> fmt::Debug for CameraManager<M, V>
where
    M: MediaDevices,
    V: VideoSurface<M::Stream>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraManager")
            .field("streaming", &self.stream.is_some())
            .field("bound", &self.surface.is_some())
            .field("last_failure", &self.last_failure)
            .finish()
    }
}

/// Rear-facing camera if any, else the first.
pub fn pick_best_camera(cameras: Vec<CameraDevice>) -> Option<CameraDevice> {
    let rear = cameras.iter().position(|c| c.facing == Facing::Rear);
    cameras.into_iter().nth(rear.unwrap_or(0))
}

fn grab<S: MediaStream, V: VideoSurface<S>>(
    surface: &V,
    canvas: &mut FrameCanvas,
) -> std::result::Result<PixelBuffer, CaptureFailure> {
    let state = surface.ready_state();
    if state < ReadyState::HaveCurrentData {
        return Err(CaptureFailure::NotReady(state));
    }

    let (width, height) = surface.video_size();
    if width == 0 || height == 0 {
        return Err(CaptureFailure::ZeroDimensions);
    }

    canvas.ensure_size(width, height);
    surface
        .draw_frame(canvas)
        .map_err(|e| CaptureFailure::DrawFailed(e.to_string()))?;
    canvas
        .snapshot()
        .map_err(|e| CaptureFailure::DrawFailed(e.to_string()))
}
