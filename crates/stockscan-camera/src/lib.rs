//! Camera stream management and frame capture for the stockscan pipeline.
//!
//! [`CameraManager`] enumerates cameras, picks the rear-facing one, opens a
//! stream (retrying once without the device constraint), binds it to a
//! display surface and copies the current frame out as a
//! [`PixelBuffer`](stockscan_core::PixelBuffer) on demand. The platform sits
//! behind the [`MediaDevices`], [`MediaStream`] and [`VideoSurface`] traits;
//! [`mock`] provides a scriptable implementation.

pub mod canvas;
pub mod error;
pub mod manager;
pub mod mock;
pub mod traits;
pub mod types;

pub use canvas::FrameCanvas;
pub use error::{CameraError, CameraErrorKind, Result};
pub use manager::{CameraManager, pick_best_camera};
pub use traits::{MediaDevices, MediaStream, VideoSurface};
pub use types::{
    CameraConfig, CameraDevice, CaptureFailure, ConstrainRange, DeviceTarget, Facing,
    MediaDeviceInfo, MediaDeviceKind, ReadyState, VideoConstraints,
};
