//! Platform media traits.
//!
//! Native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT); the manager
//! is generic over the concrete platform types.

#![allow(async_fn_in_trait)]

use crate::canvas::FrameCanvas;
use crate::error::Result;
use crate::types::{MediaDeviceInfo, ReadyState, VideoConstraints};

/// Entry point to the platform's media devices.
pub trait MediaDevices: Send + Sync {
    /// Stream type produced by this platform.
    type Stream: MediaStream;

    /// Open a video stream.
    ///
    /// # Errors
    ///
    /// Returns a classified [`CameraError`](crate::CameraError) on refusal.
    async fn get_user_media(&self, constraints: &VideoConstraints) -> Result<Self::Stream>;

    /// List media devices. Labels may be empty before permission is granted.
    async fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>>;
}

/// A live camera stream and its video track.
pub trait MediaStream: Send {
    /// Device the stream was opened on.
    fn device_id(&self) -> &str;

    /// Whether any track is still live.
    fn is_active(&self) -> bool;

    /// Stop every track. Idempotent.
    fn stop(&mut self);

    /// Whether the video track advertises a torch.
    fn torch_capable(&self) -> bool;

    /// Switch the torch.
    ///
    /// # Errors
    ///
    /// Returns an error if the track rejects the constraint.
    async fn apply_torch(&mut self, enabled: bool) -> Result<()>;
}

/// A display element the stream is rendered into.
pub trait VideoSurface<S: MediaStream>: Send {
    /// Route the stream into this surface (muted, inline playback).
    fn attach(&mut self, stream: &S);

    /// Unbind any stream.
    fn detach(&mut self);

    fn ready_state(&self) -> ReadyState;

    /// Native video dimensions, `(0, 0)` until metadata arrives.
    fn video_size(&self) -> (u32, u32);

    /// Draw the current video frame into the canvas, which has already been
    /// sized to [`video_size`](Self::video_size).
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be read back.
    fn draw_frame(&self, canvas: &mut FrameCanvas) -> Result<()>;
}
