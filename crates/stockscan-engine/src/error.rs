//! Error types for detection engine operations.
//!
//! "No symbol in this frame" is never an error: `detect` returns an empty
//! vector for it. The variants here cover lifecycle misuse and genuine
//! platform or resource failures, which the engine factory absorbs into
//! its fallback cascade.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur during engine lifecycle and detection.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `detect` was called before `initialize`.
    #[error("Engine not initialized: {engine}")]
    NotInitialized { engine: String },

    /// The engine was used after `dispose`.
    #[error("Engine disposed: {engine}")]
    Disposed { engine: String },

    /// The platform cannot host this engine.
    #[error("Unsupported engine: {message}")]
    Unsupported { message: String },

    /// Engine initialization failed.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// The decoder payload could not be fetched or instantiated.
    #[error("Decoder payload load failed: {message}")]
    PayloadLoad { message: String },

    /// The platform detector failed while analyzing a frame.
    #[error("Detection failed: {message}")]
    Detection { message: String },
}

impl EngineError {
    /// Create a new not-initialized error.
    pub fn not_initialized(engine: impl Into<String>) -> Self {
        Self::NotInitialized {
            engine: engine.into(),
        }
    }

    /// Create a new disposed error.
    pub fn disposed(engine: impl Into<String>) -> Self {
        Self::Disposed {
            engine: engine.into(),
        }
    }

    /// Create a new unsupported error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    /// Create a new payload load error.
    pub fn payload_load(message: impl Into<String>) -> Self {
        Self::PayloadLoad {
            message: message.into(),
        }
    }

    /// Create a new detection error.
    pub fn detection(message: impl Into<String>) -> Self {
        Self::Detection {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_initialized_error() {
        let error = EngineError::not_initialized("zbar-tier");
        assert_eq!(error.to_string(), "Engine not initialized: zbar-tier");
    }

    #[test]
    fn test_disposed_error() {
        let error = EngineError::disposed("native-tier");
        assert_eq!(error.to_string(), "Engine disposed: native-tier");
    }

    #[test]
    fn test_payload_load_error() {
        let error = EngineError::payload_load("fetch aborted");
        assert_eq!(error.to_string(), "Decoder payload load failed: fetch aborted");
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            EngineError::unsupported("no detector"),
            EngineError::initialization_failed("constructor threw"),
            EngineError::detection("context lost"),
        ];

        for error in errors {
            let _ = format!("{}", error);
            let _ = format!("{:?}", error);
        }
    }
}
