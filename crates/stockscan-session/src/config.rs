//! Scan session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stockscan_camera::CameraConfig;
use stockscan_core::EngineKind;
use stockscan_core::constants::{
    CAMERA_SETTLE_DELAY_MS, DEFAULT_CAMERA_DEBOUNCE_MS, DEFAULT_TARGET_FPS,
    DEFAULT_VIDEO_READY_TIMEOUT_MS,
};

/// Configuration for [`ScanSession`](crate::ScanSession).
///
/// # Examples
///
/// ```
/// use stockscan_session::SessionConfig;
///
/// let config: SessionConfig =
///     serde_json::from_str(r#"{"debounce_ms": 800, "camera": {"width": 1920}}"#).unwrap();
/// assert_eq!(config.debounce_ms, 800);
/// assert_eq!(config.camera.width, 1920);
/// assert_eq!(config.target_fps, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Poll rate for [`next_scan`](crate::ScanSession::next_scan).
    pub target_fps: u32,

    /// Minimum time between two reported camera scans.
    pub debounce_ms: u64,

    /// Pause between releasing one camera and opening the next.
    pub settle_delay_ms: u64,

    /// How long `start` waits for the first video frame.
    pub video_ready_timeout_ms: u64,

    /// Stream parameters; the device id is chosen per start.
    pub camera: CameraConfig,

    /// Force one engine tier instead of the fallback cascade.
    pub preferred_engine: Option<EngineKind>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            debounce_ms: DEFAULT_CAMERA_DEBOUNCE_MS,
            settle_delay_ms: CAMERA_SETTLE_DELAY_MS,
            video_ready_timeout_ms: DEFAULT_VIDEO_READY_TIMEOUT_MS,
            camera: CameraConfig::default(),
            preferred_engine: None,
        }
    }
}

impl SessionConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn video_ready_timeout(&self) -> Duration {
        Duration::from_millis(self.video_ready_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let config = SessionConfig::default();
        assert_eq!(config.frame_interval(), Duration::from_nanos(33_333_333));
        assert_eq!(config.debounce(), Duration::from_millis(1500));
        assert_eq!(config.settle_delay(), Duration::from_millis(300));
        assert_eq!(config.video_ready_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_fps_does_not_divide_by_zero() {
        let config = SessionConfig {
            target_fps: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
    }
}
