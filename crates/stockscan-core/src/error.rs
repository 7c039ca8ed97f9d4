use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Scan result errors
    #[error("Scan result code must not be empty")]
    EmptyCode,

    // Frame errors
    #[error("Invalid frame: {message}")]
    InvalidFrame { message: String },

    #[error("Frame dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
