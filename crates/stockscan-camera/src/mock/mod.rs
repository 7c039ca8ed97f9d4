//! Mock media stack for testing and development.
//!
//! [`MockMediaDevices`] and every [`MockStream`] / [`MockSurface`] it feeds
//! share one state block, scripted through a [`MockCameraHandle`]: which
//! cameras exist, which requests fail, whether the torch works, and which
//! frame the sensor is currently producing.

mod media;
mod surface;

pub use media::{MockCameraHandle, MockMediaDevices, MockStream};
pub use surface::MockSurface;
