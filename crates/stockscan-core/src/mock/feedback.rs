//! Recording feedback port.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::feedback::ScanFeedback;

/// One cue fired through [`MockFeedback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackEvent {
    Vibrate(u64),
    Beep,
}

type Events = Arc<Mutex<Vec<FeedbackEvent>>>;

fn lock(events: &Events) -> MutexGuard<'_, Vec<FeedbackEvent>> {
    events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Feedback port that records every cue.
///
/// # Examples
///
/// ```
/// use stockscan_core::feedback::ScanFeedback;
/// use stockscan_core::mock::{FeedbackEvent, MockFeedback};
///
/// let (feedback, handle) = MockFeedback::new();
/// feedback.vibrate(100);
/// feedback.beep();
///
/// assert_eq!(
///     handle.events(),
///     vec![FeedbackEvent::Vibrate(100), FeedbackEvent::Beep]
/// );
/// ```
#[derive(Debug)]
pub struct MockFeedback {
    events: Events,
}

impl MockFeedback {
    pub fn new() -> (Self, MockFeedbackHandle) {
        let events = Events::default();
        (
            Self {
                events: Arc::clone(&events),
            },
            MockFeedbackHandle { events },
        )
    }
}

impl ScanFeedback for MockFeedback {
    fn vibrate(&self, duration_ms: u64) {
        lock(&self.events).push(FeedbackEvent::Vibrate(duration_ms));
    }

    fn beep(&self) {
        lock(&self.events).push(FeedbackEvent::Beep);
    }
}

/// Handle for inspecting a [`MockFeedback`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MockFeedbackHandle {
    events: Events,
}

impl MockFeedbackHandle {
    /// Every cue so far, in order.
    pub fn events(&self) -> Vec<FeedbackEvent> {
        lock(&self.events).clone()
    }

    pub fn vibrations(&self) -> usize {
        lock(&self.events)
            .iter()
            .filter(|e| matches!(e, FeedbackEvent::Vibrate(_)))
            .count()
    }

    pub fn beeps(&self) -> usize {
        lock(&self.events)
            .iter()
            .filter(|e| **e == FeedbackEvent::Beep)
            .count()
    }
}
