//! Reusable offscreen drawing surface for frame capture.

use bytes::Bytes;
use stockscan_core::PixelBuffer;
use stockscan_core::constants::BYTES_PER_PIXEL;

use crate::error::{CameraError, Result};

/// RGBA8 scratch buffer the active surface draws into.
///
/// The backing storage is reallocated only when the requested dimensions
/// change, not on every frame.
#[derive(Debug, Default)]
pub struct FrameCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    resizes: usize,
}

impl FrameCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the canvas to the stream's dimensions. Returns `true` if it
    /// had to be resized.
    pub fn ensure_size(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }

        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * BYTES_PER_PIXEL];
        self.resizes += 1;
        true
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel storage for the surface to draw into.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Number of times the storage has been (re)allocated.
    pub fn resizes(&self) -> usize {
        self.resizes
    }

    /// Copy the current contents out as a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas has never been sized.
    pub fn snapshot(&self) -> Result<PixelBuffer> {
        PixelBuffer::new(self.width, self.height, Bytes::copy_from_slice(&self.pixels))
            .map_err(|e| CameraError::platform(e.to_string()))
    }
}
