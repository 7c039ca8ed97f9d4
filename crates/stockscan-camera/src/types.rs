//! Camera device and stream configuration types.

use std::fmt;

use serde::{Deserialize, Serialize};
use stockscan_core::constants::*;

/// Which way a camera faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Faces away from the operator ("environment").
    #[default]
    Rear,

    /// Faces the operator ("user").
    Front,

    /// Direction could not be inferred.
    Unknown,
}

impl Facing {
    /// Infer facing from a device label.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockscan_camera::Facing;
    ///
    /// assert_eq!(Facing::from_label("Back Camera"), Facing::Rear);
    /// assert_eq!(Facing::from_label("FaceTime HD Camera"), Facing::Front);
    /// assert_eq!(Facing::from_label("USB Video Device"), Facing::Unknown);
    /// ```
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if ["back", "rear", "environment"]
            .iter()
            .any(|word| label.contains(word))
        {
            Self::Rear
        } else if ["front", "user", "face"].iter().any(|word| label.contains(word)) {
            Self::Front
        } else {
            Self::Unknown
        }
    }
}

/// Kind of media device reported by enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaDeviceKind {
    VideoInput,
    AudioInput,
    AudioOutput,
}

/// Raw enumeration entry from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDeviceInfo {
    pub device_id: String,
    /// Empty until the platform has granted camera permission.
    pub label: String,
    pub kind: MediaDeviceKind,
}

impl MediaDeviceInfo {
    pub fn video(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
            kind: MediaDeviceKind::VideoInput,
        }
    }
}

/// A camera the operator can pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDevice {
    pub id: String,
    pub label: String,
    pub facing: Facing,
}

impl CameraDevice {
    /// Build from an enumeration entry, filling in a label if the platform
    /// gave none.
    pub fn from_info(info: &MediaDeviceInfo) -> Self {
        let label = if info.label.is_empty() {
            let short: String = info.device_id.chars().take(8).collect();
            format!("Camera {short}")
        } else {
            info.label.clone()
        };

        Self {
            id: info.device_id.clone(),
            facing: Facing::from_label(&info.label),
            label,
        }
    }
}

/// Requested stream parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Exact device to open. When unset, `facing` is used instead.
    pub device_id: Option<String>,
    pub facing: Facing,
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_id: None,
            facing: Facing::Rear,
            width: DEFAULT_CAMERA_WIDTH,
            height: DEFAULT_CAMERA_HEIGHT,
            frame_rate: DEFAULT_CAMERA_FRAME_RATE,
        }
    }
}

impl CameraConfig {
    /// Same configuration pinned to one device.
    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }
}

/// An ideal value with a hard floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstrainRange {
    pub ideal: u32,
    pub min: u32,
}

/// How the platform should pick a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceTarget {
    /// Exactly this device id.
    Exact(String),
    /// Any device facing this way.
    Facing(Facing),
}

/// Constraints passed to the platform when opening a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConstraints {
    pub width: ConstrainRange,
    pub height: ConstrainRange,
    pub frame_rate: ConstrainRange,
    pub target: DeviceTarget,
}

impl VideoConstraints {
    pub fn from_config(config: &CameraConfig) -> Self {
        let target = match &config.device_id {
            Some(id) => DeviceTarget::Exact(id.clone()),
            None => DeviceTarget::Facing(config.facing),
        };

        Self {
            width: ConstrainRange {
                ideal: config.width,
                min: MIN_CAMERA_WIDTH,
            },
            height: ConstrainRange {
                ideal: config.height,
                min: MIN_CAMERA_HEIGHT,
            },
            frame_rate: ConstrainRange {
                ideal: config.frame_rate,
                min: MIN_CAMERA_FRAME_RATE,
            },
            target,
        }
    }

    /// Baseline request used only to obtain permission.
    pub fn permission_request() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

/// Media element readiness, ordered by how much data is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadyState {
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

/// Why the most recent frame capture produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureFailure {
    /// No display surface bound.
    NoSurface,
    /// The surface has not produced a frame yet.
    NotReady(ReadyState),
    /// The stream reports zero width or height.
    ZeroDimensions,
    /// Copying the frame out of the surface failed.
    DrawFailed(String),
}

impl fmt::Display for CaptureFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSurface => write!(f, "no surface bound"),
            Self::NotReady(state) => write!(f, "surface not ready ({state:?})"),
            Self::ZeroDimensions => write!(f, "zero video dimensions"),
            Self::DrawFailed(message) => write!(f, "draw failed: {message}"),
        }
    }
}
