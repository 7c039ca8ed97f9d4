//! Mock collaborators for testing without a host platform.

mod feedback;

pub use feedback::{FeedbackEvent, MockFeedback, MockFeedbackHandle};
