//! Session errors.

use stockscan_camera::CameraError;
use stockscan_engine::EngineError;

use crate::state::SessionState;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors surfaced by [`ScanSession`](crate::ScanSession).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `start` was called while a start or scan was already under way.
    #[error("Session already {state}")]
    AlreadyRunning { state: SessionState },

    /// The surface was lost in an earlier failed start.
    #[error("No display surface available")]
    NoSurface,

    /// The bound surface never delivered a frame.
    #[error("Video load timeout after {timeout_ms} ms")]
    VideoTimeout { timeout_ms: u64 },

    /// A stop request arrived while starting.
    #[error("Scanner initialization aborted")]
    Aborted,

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl SessionError {
    /// Message suitable for showing to the operator.
    pub fn user_message(&self) -> String {
        match self {
            Self::Camera(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
