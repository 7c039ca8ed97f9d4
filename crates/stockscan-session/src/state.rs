//! Session lifecycle states.
//!
//! ```text
//! Idle ──start──► Initializing ──ok──► Scanning ──stop──► Idle
//!                      │
//!                      └──error / abort──► Idle
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No camera or engine held.
    #[default]
    Idle,

    /// Acquiring engine and camera.
    Initializing,

    /// Camera streaming, frames being polled.
    Scanning,
}

impl SessionState {
    /// Check if a transition to `target` is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockscan_session::SessionState;
    ///
    /// assert!(SessionState::Idle.can_transition_to(&SessionState::Initializing));
    /// assert!(!SessionState::Idle.can_transition_to(&SessionState::Scanning));
    /// ```
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            (SessionState::Idle, SessionState::Initializing)
                | (SessionState::Initializing, SessionState::Scanning | SessionState::Idle)
                | (SessionState::Scanning, SessionState::Idle)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            SessionState::Idle => "idle",
            SessionState::Initializing => "initializing",
            SessionState::Scanning => "scanning",
        };
        write!(f, "{}", state_str)
    }
}
