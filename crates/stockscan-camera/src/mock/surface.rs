//! Mock video surface.

use crate::canvas::FrameCanvas;
use crate::error::{CameraError, Result};
use crate::traits::VideoSurface;
use crate::types::ReadyState;

use super::media::{MockStream, SharedState, lock};

/// Simulated display element. Shows whatever frame the mock sensor is
/// producing while attached.
#[derive(Debug, Default)]
pub struct MockSurface {
    source: Option<SharedState>,
    attaches: usize,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.source.is_some()
    }

    /// Number of times a stream was attached.
    pub fn attaches(&self) -> usize {
        self.attaches
    }
}

impl VideoSurface<MockStream> for MockSurface {
    fn attach(&mut self, stream: &MockStream) {
        self.source = Some(stream.state.clone());
        self.attaches += 1;
    }

    fn detach(&mut self) {
        self.source = None;
    }

    fn ready_state(&self) -> ReadyState {
        self.source
            .as_ref()
            .map_or(ReadyState::HaveNothing, |state| lock(state).ready)
    }

    fn video_size(&self) -> (u32, u32) {
        self.source
            .as_ref()
            .and_then(|state| {
                lock(state)
                    .frame
                    .as_ref()
                    .map(|frame| (frame.width(), frame.height()))
            })
            .unwrap_or((0, 0))
    }

    fn draw_frame(&self, canvas: &mut FrameCanvas) -> Result<()> {
        let state = self
            .source
            .as_ref()
            .ok_or_else(|| CameraError::platform("Surface not attached"))?;
        let state = lock(state);
        let frame = state
            .frame
            .as_ref()
            .ok_or_else(|| CameraError::platform("No frame available"))?;

        let pixels = canvas.pixels_mut();
        if pixels.len() != frame.data().len() {
            return Err(CameraError::platform("Canvas size does not match frame"));
        }
        pixels.copy_from_slice(frame.data());
        Ok(())
    }
}
