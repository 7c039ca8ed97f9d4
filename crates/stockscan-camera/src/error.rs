//! Camera acquisition errors.
//!
//! Platform failures arrive as loosely named errors. [`CameraError::from_platform`]
//! classifies them so the UI can show an actionable message instead of a
//! raw platform string.

/// Result type alias for camera operations.
pub type Result<T> = std::result::Result<T, CameraError>;

/// Coarse classification used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraErrorKind {
    /// Camera access was refused.
    Permission,

    /// No camera is attached.
    NotFound,

    /// Another process holds the camera.
    InUse,

    /// Anything else.
    Other,
}

/// Errors that can occur while acquiring or using a camera.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    /// The user or platform refused camera access.
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// No video input device exists.
    #[error("No camera found: {message}")]
    NotFound { message: String },

    /// The camera is held by another application.
    #[error("Camera in use: {message}")]
    InUse { message: String },

    /// A specific requested device could not be opened.
    #[error("Camera device unavailable: {device_id}")]
    DeviceUnavailable { device_id: String },

    /// No device satisfies the requested constraints.
    #[error("Constraints cannot be satisfied: {constraint}")]
    Overconstrained { constraint: String },

    /// An operation needed a running stream.
    #[error("No stream available, start a stream first")]
    NoStream,

    /// Unclassified platform failure.
    #[error("Camera error: {message}")]
    Platform { message: String },
}

impl CameraError {
    /// Create a new permission denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a new not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new in-use error.
    pub fn in_use(message: impl Into<String>) -> Self {
        Self::InUse {
            message: message.into(),
        }
    }

    /// Create a new device unavailable error.
    pub fn device_unavailable(device_id: impl Into<String>) -> Self {
        Self::DeviceUnavailable {
            device_id: device_id.into(),
        }
    }

    /// Create a new overconstrained error.
    pub fn overconstrained(constraint: impl Into<String>) -> Self {
        Self::Overconstrained {
            constraint: constraint.into(),
        }
    }

    /// Create a new platform error.
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }

    /// Classify a platform error by its name.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockscan_camera::{CameraError, CameraErrorKind};
    ///
    /// let error = CameraError::from_platform("NotReadableError", "Could not start video source");
    /// assert_eq!(error.kind(), CameraErrorKind::InUse);
    /// ```
    pub fn from_platform(name: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match name {
            "NotAllowedError" | "PermissionDeniedError" | "SecurityError" => {
                Self::permission_denied(message)
            }
            "NotFoundError" | "DevicesNotFoundError" => Self::not_found(message),
            "NotReadableError" | "TrackStartError" | "AbortError" => Self::in_use(message),
            "OverconstrainedError" | "ConstraintNotSatisfiedError" => {
                Self::overconstrained(message)
            }
            _ => Self::platform(format!("{name}: {message}")),
        }
    }

    pub fn kind(&self) -> CameraErrorKind {
        match self {
            Self::PermissionDenied { .. } => CameraErrorKind::Permission,
            Self::NotFound { .. } => CameraErrorKind::NotFound,
            Self::InUse { .. } => CameraErrorKind::InUse,
            Self::DeviceUnavailable { .. }
            | Self::Overconstrained { .. }
            | Self::NoStream
            | Self::Platform { .. } => CameraErrorKind::Other,
        }
    }

    /// Message suitable for showing to the operator.
    pub fn user_message(&self) -> String {
        match self.kind() {
            CameraErrorKind::Permission => {
                "Camera permission denied. Please allow camera access in your settings.".to_string()
            }
            CameraErrorKind::NotFound => {
                "No camera found. Please ensure your device has a camera.".to_string()
            }
            CameraErrorKind::InUse => {
                "Camera is in use by another application. Please close other apps using the camera."
                    .to_string()
            }
            CameraErrorKind::Other => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("NotAllowedError", CameraErrorKind::Permission)]
    #[case("SecurityError", CameraErrorKind::Permission)]
    #[case("NotFoundError", CameraErrorKind::NotFound)]
    #[case("NotReadableError", CameraErrorKind::InUse)]
    #[case("TrackStartError", CameraErrorKind::InUse)]
    #[case("OverconstrainedError", CameraErrorKind::Other)]
    #[case("TypeError", CameraErrorKind::Other)]
    fn test_platform_classification(#[case] name: &str, #[case] kind: CameraErrorKind) {
        assert_eq!(CameraError::from_platform(name, "boom").kind(), kind);
    }

    #[test]
    fn test_user_messages() {
        assert!(
            CameraError::permission_denied("x")
                .user_message()
                .starts_with("Camera permission denied")
        );
        assert!(
            CameraError::not_found("x")
                .user_message()
                .starts_with("No camera found")
        );
        assert!(
            CameraError::in_use("x")
                .user_message()
                .contains("in use by another application")
        );
    }

    #[test]
    fn test_unclassified_message_keeps_platform_text() {
        let error = CameraError::from_platform("TypeError", "bad constraints");
        assert_eq!(error.user_message(), "Camera error: TypeError: bad constraints");
    }
}
