//! Operator feedback on an accepted scan.
//!
//! Both the camera session and the keyboard-wedge scanner signal an
//! accepted scan through a [`ScanFeedback`] port. The host decides what a
//! vibration or a beep means on its platform; [`SilentFeedback`] does
//! nothing and is the default.

/// Haptic and audio cues fired once per accepted scan.
///
/// Implementations must not block; they are called on the scan path.
pub trait ScanFeedback: Send + Sync {
    /// Vibrate for `duration_ms` milliseconds, if the device can.
    fn vibrate(&self, duration_ms: u64);

    /// Play the short confirmation tone.
    fn beep(&self);
}

/// Feedback that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl ScanFeedback for SilentFeedback {
    fn vibrate(&self, _duration_ms: u64) {}

    fn beep(&self) {}
}
