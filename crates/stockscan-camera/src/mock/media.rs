//! Mock media devices and streams.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use stockscan_core::PixelBuffer;

use crate::error::{CameraError, Result};
use crate::traits::{MediaDevices, MediaStream};
use crate::types::{DeviceTarget, Facing, MediaDeviceInfo, ReadyState, VideoConstraints};

#[derive(Debug)]
pub(crate) struct MediaState {
    devices: Vec<MediaDeviceInfo>,
    permission_error: Option<CameraError>,
    enumerate_error: Option<CameraError>,
    unavailable: HashSet<String>,
    torch_capable: bool,
    torch_error: Option<CameraError>,
    torch_on: bool,
    requests: Vec<VideoConstraints>,
    active_streams: usize,
    next_stream: usize,
    pub(crate) ready: ReadyState,
    pub(crate) frame: Option<PixelBuffer>,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            permission_error: None,
            enumerate_error: None,
            unavailable: HashSet::new(),
            torch_capable: false,
            torch_error: None,
            torch_on: false,
            requests: Vec::new(),
            active_streams: 0,
            next_stream: 0,
            ready: ReadyState::HaveNothing,
            frame: None,
        }
    }
}

pub(crate) type SharedState = Arc<Mutex<MediaState>>;

pub(crate) fn lock(state: &SharedState) -> MutexGuard<'_, MediaState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Simulated platform media devices.
#[derive(Debug)]
pub struct MockMediaDevices {
    state: SharedState,
}

impl MockMediaDevices {
    /// Create a media stack with no cameras.
    pub fn new() -> (Self, MockCameraHandle) {
        let state = SharedState::default();
        (
            Self {
                state: Arc::clone(&state),
            },
            MockCameraHandle { state },
        )
    }

    fn open(&self, constraints: &VideoConstraints) -> Result<MockStream> {
        let mut state = lock(&self.state);
        state.requests.push(constraints.clone());

        if let Some(error) = &state.permission_error {
            return Err(error.clone());
        }

        let device = match &constraints.target {
            DeviceTarget::Exact(id) => {
                if state.unavailable.contains(id) {
                    return Err(CameraError::device_unavailable(id.clone()));
                }
                if !state.devices.iter().any(|d| &d.device_id == id) {
                    return Err(CameraError::overconstrained(format!("deviceId {id}")));
                }
                id.clone()
            }
            DeviceTarget::Facing(facing) => state
                .devices
                .iter()
                .filter(|d| !state.unavailable.contains(&d.device_id))
                .find(|d| Facing::from_label(&d.label) == *facing)
                .or_else(|| {
                    state
                        .devices
                        .iter()
                        .find(|d| !state.unavailable.contains(&d.device_id))
                })
                .map(|d| d.device_id.clone())
                .ok_or_else(|| CameraError::not_found("Requested device not found"))?,
        };

        state.active_streams += 1;
        state.next_stream += 1;
        Ok(MockStream {
            id: format!("stream-{}", state.next_stream),
            device_id: device,
            active: true,
            state: Arc::clone(&self.state),
        })
    }
}

impl MediaDevices for MockMediaDevices {
    type Stream = MockStream;

    async fn get_user_media(&self, constraints: &VideoConstraints) -> Result<MockStream> {
        self.open(constraints)
    }

    async fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>> {
        let state = lock(&self.state);
        match &state.enumerate_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.devices.clone()),
        }
    }
}

/// Simulated camera stream.
#[derive(Debug)]
pub struct MockStream {
    id: String,
    device_id: String,
    active: bool,
    pub(crate) state: SharedState,
}

impl MockStream {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl MediaStream for MockStream {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self) {
        if self.active {
            self.active = false;
            let mut state = lock(&self.state);
            state.active_streams = state.active_streams.saturating_sub(1);
            state.torch_on = false;
        }
    }

    fn torch_capable(&self) -> bool {
        lock(&self.state).torch_capable
    }

    async fn apply_torch(&mut self, enabled: bool) -> Result<()> {
        let mut state = lock(&self.state);
        if let Some(error) = &state.torch_error {
            return Err(error.clone());
        }
        state.torch_on = enabled;
        Ok(())
    }
}

/// Handle for scripting a [`MockMediaDevices`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MockCameraHandle {
    state: SharedState,
}

impl MockCameraHandle {
    /// Add a video input.
    pub fn add_camera(&self, device_id: impl Into<String>, label: impl Into<String>) {
        lock(&self.state)
            .devices
            .push(MediaDeviceInfo::video(device_id, label));
    }

    /// Add an arbitrary enumeration entry.
    pub fn add_device(&self, info: MediaDeviceInfo) {
        lock(&self.state).devices.push(info);
    }

    /// Make every stream request fail with this error.
    pub fn fail_requests(&self, error: CameraError) {
        lock(&self.state).permission_error = Some(error);
    }

    /// Make device enumeration fail.
    pub fn fail_enumeration(&self, error: CameraError) {
        lock(&self.state).enumerate_error = Some(error);
    }

    /// Make exact requests for this device fail.
    pub fn make_unavailable(&self, device_id: impl Into<String>) {
        lock(&self.state).unavailable.insert(device_id.into());
    }

    pub fn set_torch_capable(&self, capable: bool) {
        lock(&self.state).torch_capable = capable;
    }

    /// Make torch changes fail.
    pub fn fail_torch(&self, error: CameraError) {
        lock(&self.state).torch_error = Some(error);
    }

    pub fn torch_on(&self) -> bool {
        lock(&self.state).torch_on
    }

    /// Deliver a frame; the surface becomes fully ready at its size.
    pub fn produce_frame(&self, frame: PixelBuffer) {
        let mut state = lock(&self.state);
        state.frame = Some(frame);
        state.ready = ReadyState::HaveEnoughData;
    }

    /// Override the surface readiness.
    pub fn set_ready_state(&self, ready: ReadyState) {
        lock(&self.state).ready = ready;
    }

    /// Every constraint set passed to `get_user_media`, in order.
    pub fn requests(&self) -> Vec<VideoConstraints> {
        lock(&self.state).requests.clone()
    }

    /// Streams opened and not yet stopped.
    pub fn active_streams(&self) -> usize {
        lock(&self.state).active_streams
    }
}
