//! Keyboard-wedge barcode scanner decoding.
//!
//! Handheld scanners that act as keyboards inject their payload into the
//! ordinary key stream. [`WedgeDecoder`] separates those bursts from human
//! typing by inter-key timing, and [`HardwareScanner`] wraps it in an
//! attach/detach subscription fed by a key-event channel.

pub mod config;
pub mod decoder;
pub mod key;
pub mod listener;

pub use config::{AcceptKey, WedgeConfig};
pub use decoder::{KeyOutcome, WedgeDecoder};
pub use key::{FocusTarget, Key, KeyEvent, Modifiers};
pub use listener::HardwareScanner;
