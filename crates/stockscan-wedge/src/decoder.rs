//! Keystroke-timing state machine.
//!
//! A keyboard-wedge scanner types its payload at machine speed and ends it
//! with an accept key. Humans cannot keep every gap under the burst
//! threshold across four or more characters, so the decoder tells the two
//! apart by timing alone.
//!
//! # Transitions (per processed key)
//!
//! 1. Gap since the previous key above `burst_gap` with a non-empty buffer:
//!    clear the buffer first.
//! 2. Accept key: if the buffer is at least `min_length` long and the last
//!    accepted scan is more than `debounce` ago, emit a `HARDWARE` scan.
//!    The buffer is cleared either way.
//! 3. Single printable character without a shortcut modifier: append.
//! 4. Record the key time.
//!
//! Keys aimed at a text-entry element are not processed at all.
//!
//! # Examples
//!
//! ```
//! use std::time::{Duration, Instant};
//! use stockscan_wedge::{KeyEvent, WedgeConfig, WedgeDecoder};
//!
//! let mut decoder = WedgeDecoder::new(WedgeConfig::default());
//! let start = Instant::now();
//!
//! for (i, key) in ["1", "2", "3", "4"].into_iter().enumerate() {
//!     decoder.process(&KeyEvent::named(key, start + Duration::from_millis(10 * i as u64)));
//! }
//! let outcome = decoder.process(&KeyEvent::named("Enter", start + Duration::from_millis(50)));
//!
//! let scan = outcome.scan().unwrap();
//! assert_eq!(scan.code(), "1234");
//! assert_eq!(scan.format(), "HARDWARE");
//! assert!(outcome.suppress_default());
//! ```

use std::time::Instant;

use stockscan_core::ScanResult;
use stockscan_core::constants::FORMAT_HARDWARE;
use tracing::{debug, info, trace};

use crate::config::WedgeConfig;
use crate::key::{Key, KeyEvent};

/// What the decoder did with one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not processed: decoder disabled or focus in a text-entry element.
    Ignored,

    /// Processed without emitting a scan.
    Consumed,

    /// The accept key completed a scan.
    Scan(ScanResult),
}

impl KeyOutcome {
    /// Whether the key's default action should be suppressed.
    pub fn suppress_default(&self) -> bool {
        matches!(self, Self::Scan(_))
    }

    pub fn scan(&self) -> Option<&ScanResult> {
        match self {
            Self::Scan(scan) => Some(scan),
            _ => None,
        }
    }
}

/// Keyboard-wedge decoder state.
#[derive(Debug, Clone)]
pub struct WedgeDecoder {
    config: WedgeConfig,
    buffer: String,
    last_key: Option<Instant>,
    last_accept: Option<Instant>,
}

impl WedgeDecoder {
    pub fn new(config: WedgeConfig) -> Self {
        Self {
            config,
            buffer: String::new(),
            last_key: None,
            last_accept: None,
        }
    }

    pub fn config(&self) -> &WedgeConfig {
        &self.config
    }

    /// Characters accumulated in the current burst.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Drop the current burst.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Forget the last accepted scan so the next one is not debounced.
    pub fn reset_debounce(&mut self) {
        self.last_accept = None;
    }

    pub fn set_min_length(&mut self, min_length: usize) {
        self.config.min_length = min_length;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            self.buffer.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Feed one keydown event.
    pub fn process(&mut self, event: &KeyEvent) -> KeyOutcome {
        if !self.config.enabled || event.target.is_text_entry() {
            return KeyOutcome::Ignored;
        }

        if let Some(last) = self.last_key {
            let gap = event.at.saturating_duration_since(last);
            if gap > self.config.burst_gap() && !self.buffer.is_empty() {
                trace!(
                    gap_ms = gap.as_millis() as u64,
                    discarded = self.buffer.len(),
                    "Burst gap exceeded, buffer reset"
                );
                self.buffer.clear();
            }
        }

        let outcome = if self.config.accept_key.matches(&event.key) {
            self.accept(event.at)
        } else {
            if let Key::Char(c) = event.key {
                if !event.modifiers.is_shortcut() {
                    self.buffer.push(c);
                }
            }
            KeyOutcome::Consumed
        };

        self.last_key = Some(event.at);
        outcome
    }

    fn accept(&mut self, at: Instant) -> KeyOutcome {
        let code = std::mem::take(&mut self.buffer);

        if code.chars().count() < self.config.min_length {
            if !code.is_empty() {
                debug!(
                    length = code.len(),
                    min = self.config.min_length,
                    "Burst too short, ignored"
                );
            }
            return KeyOutcome::Consumed;
        }

        let debounced = self
            .last_accept
            .is_some_and(|last| at.saturating_duration_since(last) <= self.config.debounce());
        if debounced {
            debug!("Hardware scan debounced");
            return KeyOutcome::Consumed;
        }

        match ScanResult::new(code, FORMAT_HARDWARE) {
            Ok(scan) => {
                self.last_accept = Some(at);
                info!(code = scan.code(), "Hardware scan accepted");
                KeyOutcome::Scan(scan)
            }
            Err(_) => KeyOutcome::Consumed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{FocusTarget, Modifiers};
    use std::time::Duration;

    struct Typist {
        decoder: WedgeDecoder,
        start: Instant,
    }

    impl Typist {
        fn new(config: WedgeConfig) -> Self {
            Self {
                decoder: WedgeDecoder::new(config),
                start: Instant::now(),
            }
        }

        fn at(&self, ms: u64) -> Instant {
            self.start + Duration::from_millis(ms)
        }

        fn key(&mut self, name: &str, ms: u64) -> KeyOutcome {
            let event = KeyEvent::named(name, self.at(ms));
            self.decoder.process(&event)
        }

        /// Type `text` with `interval` between keys, then the accept key one
        /// interval later. Returns the outcome of the accept key.
        fn burst(&mut self, text: &str, start_ms: u64, interval: u64) -> KeyOutcome {
            let mut t = start_ms;
            for c in text.chars() {
                self.key(&c.to_string(), t);
                t += interval;
            }
            self.key("Enter", t)
        }
    }

    #[test]
    fn test_scanner_burst_emits_scan() {
        let mut typist = Typist::new(WedgeConfig::default());
        let outcome = typist.burst("04912345", 0, 10);

        assert_eq!(outcome.scan().unwrap().code(), "04912345");
        assert_eq!(outcome.scan().unwrap().format(), FORMAT_HARDWARE);
        assert!(typist.decoder.buffer().is_empty());
    }

    #[test]
    fn test_human_typing_emits_nothing() {
        let mut typist = Typist::new(WedgeConfig::default());
        let outcome = typist.burst("04912345", 0, 60);
        assert_eq!(outcome, KeyOutcome::Consumed);
    }

    #[test]
    fn test_gap_boundary() {
        let mut typist = Typist::new(WedgeConfig::default());
        assert!(typist.burst("1234", 0, 50).scan().is_some());

        let mut typist = Typist::new(WedgeConfig::default());
        assert!(typist.burst("012345678905", 0, 51).scan().is_none());
    }

    #[test]
    fn test_slow_prefix_then_fast_scan() {
        let mut typist = Typist::new(WedgeConfig::default());
        typist.key("a", 0);
        typist.key("b", 100);
        typist.key("c", 200);

        let outcome = typist.burst("1234", 300, 10);
        assert_eq!(outcome.scan().unwrap().code(), "1234");
    }

    #[test]
    fn test_debounce_window() {
        let mut typist = Typist::new(WedgeConfig::default());
        assert!(typist.burst("012345678905", 0, 10).scan().is_some());

        // Second burst ends 230ms after the first accept
        assert!(typist.burst("5901234123457", 220, 10).scan().is_none());

        // Third burst well past the window
        assert!(typist.burst("5901234123457", 800, 10).scan().is_some());
    }

    #[test]
    fn test_reset_debounce_allows_immediate_rescan() {
        let mut typist = Typist::new(WedgeConfig::default());
        assert!(typist.burst("1234", 0, 10).scan().is_some());
        typist.decoder.reset_debounce();
        assert!(typist.burst("1234", 60, 10).scan().is_some());
    }

    #[test]
    fn test_min_length() {
        let mut typist = Typist::new(WedgeConfig::default());
        assert!(typist.burst("123", 0, 10).scan().is_none());

        let mut typist = Typist::new(WedgeConfig::default().with_min_length(3));
        assert_eq!(typist.burst("123", 0, 10).scan().unwrap().code(), "123");
    }

    #[test]
    fn test_text_entry_focus_is_ignored() {
        let mut decoder = WedgeDecoder::new(WedgeConfig::default());
        let start = Instant::now();

        for (i, c) in "1234".chars().enumerate() {
            let event = KeyEvent::new(Key::Char(c), start + Duration::from_millis(i as u64 * 10))
                .with_target(FocusTarget::Input);
            assert_eq!(decoder.process(&event), KeyOutcome::Ignored);
        }
        let enter = KeyEvent::new(Key::Enter, start + Duration::from_millis(40))
            .with_target(FocusTarget::Input);
        assert_eq!(decoder.process(&enter), KeyOutcome::Ignored);
        assert!(decoder.buffer().is_empty());
    }

    #[test]
    fn test_shortcut_modifiers_not_buffered() {
        for modifiers in [Modifiers::CTRL, Modifiers::ALT, Modifiers::META] {
            let mut decoder = WedgeDecoder::new(WedgeConfig::default());
            let start = Instant::now();

            for (i, c) in "1234".chars().enumerate() {
                let at = start + Duration::from_millis(i as u64 * 10);
                let event = KeyEvent::new(Key::Char(c), at).with_modifiers(modifiers);
                assert_eq!(decoder.process(&event), KeyOutcome::Consumed);
            }
            let enter = KeyEvent::new(Key::Enter, start + Duration::from_millis(40));
            assert!(decoder.process(&enter).scan().is_none());
        }
    }

    #[test]
    fn test_shifted_characters_are_buffered() {
        let mut decoder = WedgeDecoder::new(WedgeConfig::default());
        let start = Instant::now();
        let shift = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };

        for (i, c) in "PKL-A1".chars().enumerate() {
            let event = KeyEvent::new(Key::Char(c), start + Duration::from_millis(i as u64 * 5))
                .with_modifiers(shift);
            decoder.process(&event);
        }
        let enter = KeyEvent::new(Key::Enter, start + Duration::from_millis(30));
        assert_eq!(decoder.process(&enter).scan().unwrap().code(), "PKL-A1");
    }

    #[test]
    fn test_tab_accept_key() {
        let config = WedgeConfig {
            accept_key: crate::config::AcceptKey::Tab,
            ..WedgeConfig::default()
        };
        let mut typist = Typist::new(config);

        // Enter is just another non-printable key now
        assert!(typist.burst("1234", 0, 10).scan().is_none());

        for (i, c) in "5678".chars().enumerate() {
            typist.key(&c.to_string(), 100 + i as u64 * 10);
        }
        let outcome = typist.key("Tab", 140);
        assert_eq!(outcome.scan().unwrap().code(), "5678");
    }

    #[test]
    fn test_disabled_decoder_ignores_everything() {
        let mut typist = Typist::new(WedgeConfig::default());
        typist.key("1", 0);
        typist.decoder.set_enabled(false);

        assert!(typist.decoder.buffer().is_empty());
        assert_eq!(typist.key("2", 10), KeyOutcome::Ignored);
        assert_eq!(typist.key("Enter", 20), KeyOutcome::Ignored);
    }
}
