//! Hardware scanner configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stockscan_core::constants::{
    DEFAULT_BURST_GAP_MS, DEFAULT_HARDWARE_DEBOUNCE_MS, DEFAULT_MIN_BARCODE_LENGTH,
};

use crate::key::Key;

/// Key that terminates a scanner burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptKey {
    #[default]
    Enter,
    Tab,
}

impl AcceptKey {
    pub fn matches(&self, key: &Key) -> bool {
        matches!(
            (self, key),
            (Self::Enter, Key::Enter) | (Self::Tab, Key::Tab)
        )
    }
}

/// Configuration for the keyboard-wedge decoder.
///
/// # Examples
///
/// ```
/// use stockscan_wedge::WedgeConfig;
///
/// let config: WedgeConfig = serde_json::from_str(r#"{"min_length": 8}"#).unwrap();
/// assert_eq!(config.min_length, 8);
/// assert_eq!(config.burst_gap_ms, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WedgeConfig {
    /// Listen for keystrokes at all.
    pub enabled: bool,

    /// Largest gap between two keystrokes of one burst.
    pub burst_gap_ms: u64,

    /// Shortest buffer accepted as a barcode.
    pub min_length: usize,

    /// Minimum time between two accepted scans.
    pub debounce_ms: u64,

    pub accept_key: AcceptKey,
}

impl Default for WedgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            burst_gap_ms: DEFAULT_BURST_GAP_MS,
            min_length: DEFAULT_MIN_BARCODE_LENGTH,
            debounce_ms: DEFAULT_HARDWARE_DEBOUNCE_MS,
            accept_key: AcceptKey::Enter,
        }
    }
}

impl WedgeConfig {
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn burst_gap(&self) -> Duration {
        Duration::from_millis(self.burst_gap_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
