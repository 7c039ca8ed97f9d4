//! Mock platform collaborators for testing and development.
//!
//! These stand in for the host runtime's detector, decoder payload and
//! software decoder so the engine cascade can be exercised without a camera
//! or a browser.

pub mod decoder;
pub mod detector;
pub mod platform;

pub use decoder::{LoadCounter, MockLinearDecoder, MockMatrixDecoder, MockPayloadLoader};
pub use detector::{MockNativeDetector, MockNativeHandle};
pub use platform::{MockPlatform, MockPlatformBuilder};

use std::sync::{Mutex, MutexGuard};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
