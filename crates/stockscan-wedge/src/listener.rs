//! Keystroke listener subscription.
//!
//! [`HardwareScanner`] owns a [`WedgeDecoder`] and, while attached, a task
//! draining a channel of key events into it. Attach and detach are explicit
//! and tied to the owner's lifetime; detaching (or dropping the scanner)
//! always stops the task and clears the buffer.
//!
//! ```text
//!  keys ──mpsc──► listener task ──► WedgeDecoder ──► on_scan(&ScanResult)
//!                                               ├──► last_scan
//!                                               └──► feedback.vibrate
//! ```
//!
//! Hosts that must know whether to suppress a key's default action can call
//! [`HardwareScanner::handle_key`] directly instead of using the channel.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use stockscan_core::constants::SCAN_VIBRATION_MS;
use stockscan_core::{ScanFeedback, ScanResult, SilentFeedback};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::WedgeConfig;
use crate::decoder::{KeyOutcome, WedgeDecoder};
use crate::key::KeyEvent;

type ScanCallback = Arc<dyn Fn(&ScanResult) + Send + Sync>;

#[derive(Debug)]
struct Shared {
    decoder: WedgeDecoder,
    last_scan: Option<ScanResult>,
}

/// Keyboard-wedge scanner subscription.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use std::time::{Duration, Instant};
/// use stockscan_wedge::{HardwareScanner, KeyEvent, WedgeConfig};
/// use tokio::sync::mpsc;
///
/// #[tokio::main]
/// async fn main() {
///     let seen = Arc::new(Mutex::new(Vec::new()));
///     let sink = seen.clone();
///     let mut scanner = HardwareScanner::new(WedgeConfig::default(), move |scan| {
///         sink.lock().unwrap().push(scan.code().to_string());
///     });
///
///     let (tx, rx) = mpsc::channel(64);
///     scanner.attach(rx);
///     assert!(scanner.is_listening());
///
///     let start = Instant::now();
///     for (i, key) in ["A", "B", "C", "1", "Enter"].into_iter().enumerate() {
///         let at = start + Duration::from_millis(i as u64 * 8);
///         tx.send(KeyEvent::named(key, at)).await.unwrap();
///     }
///     drop(tx);
///     scanner.closed().await;
///
///     assert_eq!(*seen.lock().unwrap(), vec!["ABC1"]);
///     assert_eq!(scanner.last_scan().unwrap().code(), "ABC1");
/// }
/// ```
pub struct HardwareScanner {
    shared: Arc<Mutex<Shared>>,
    on_scan: ScanCallback,
    feedback: Arc<dyn ScanFeedback>,
    task: Option<JoinHandle<()>>,
}

impl HardwareScanner {
    /// Create a detached scanner.
    pub fn new(config: WedgeConfig, on_scan: impl Fn(&ScanResult) + Send + Sync + 'static) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                decoder: WedgeDecoder::new(config),
                last_scan: None,
            })),
            on_scan: Arc::new(on_scan),
            feedback: Arc::new(SilentFeedback),
            task: None,
        }
    }

    /// Vibrate through `feedback` on every accepted scan.
    ///
    /// Takes effect on the next [`attach`](Self::attach).
    pub fn with_feedback(mut self, feedback: Arc<dyn ScanFeedback>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Start consuming key events. Replaces any previous subscription.
    ///
    /// Must be called within a Tokio runtime.
    pub fn attach(&mut self, mut events: mpsc::Receiver<KeyEvent>) {
        self.detach();

        let shared = Arc::clone(&self.shared);
        let on_scan = Arc::clone(&self.on_scan);
        let feedback = Arc::clone(&self.feedback);
        self.task = Some(tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                dispatch(&shared, &on_scan, feedback.as_ref(), &event);
            }
            debug!("Key event source closed");
        }));
        debug!("Hardware scanner attached");
    }

    /// Stop consuming key events and clear the buffer. Idempotent.
    pub fn detach(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Hardware scanner detached");
        }
        lock(&self.shared).decoder.clear();
    }

    /// Wait until the attached event source closes.
    pub async fn closed(&mut self) {
        if let Some(task) = self.task.as_mut() {
            let _ = task.await;
            self.task = None;
        }
    }

    /// Process one key synchronously and report what happened to it.
    pub fn handle_key(&self, event: &KeyEvent) -> KeyOutcome {
        dispatch(&self.shared, &self.on_scan, self.feedback.as_ref(), event)
    }

    /// Attached to a live event source and enabled.
    pub fn is_listening(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
            && lock(&self.shared).decoder.is_enabled()
    }

    pub fn set_enabled(&self, enabled: bool) {
        lock(&self.shared).decoder.set_enabled(enabled);
        debug!(enabled, "Hardware scanner toggled");
    }

    /// Override the minimum accepted length.
    pub fn set_min_length(&self, min_length: usize) {
        lock(&self.shared).decoder.set_min_length(min_length);
    }

    /// Most recent accepted scan.
    pub fn last_scan(&self) -> Option<ScanResult> {
        lock(&self.shared).last_scan.clone()
    }

    /// Forget the most recent scan.
    pub fn clear_last_scan(&self) {
        lock(&self.shared).last_scan = None;
    }
}

impl Drop for HardwareScanner {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for HardwareScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HardwareScanner")
            .field("attached", &self.task.is_some())
            .field("shared", &*lock(&self.shared))
            .finish()
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn dispatch(
    shared: &Mutex<Shared>,
    on_scan: &ScanCallback,
    feedback: &dyn ScanFeedback,
    event: &KeyEvent,
) -> KeyOutcome {
    let outcome = {
        let mut shared = lock(shared);
        let outcome = shared.decoder.process(event);
        if let Some(scan) = outcome.scan() {
            shared.last_scan = Some(scan.clone());
        }
        outcome
    };

    // Callback runs outside the lock so it may call back into the scanner
    if let Some(scan) = outcome.scan() {
        feedback.vibrate(SCAN_VIBRATION_MS);
        on_scan(scan);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};
    use stockscan_core::mock::{FeedbackEvent, MockFeedback};

    fn counting() -> (HardwareScanner, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&count);
        let scanner = HardwareScanner::new(WedgeConfig::default(), move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        (scanner, count)
    }

    fn type_burst(scanner: &HardwareScanner, text: &str, start: Instant) -> KeyOutcome {
        let mut at = start;
        for c in text.chars() {
            scanner.handle_key(&KeyEvent::named(&c.to_string(), at));
            at += Duration::from_millis(10);
        }
        scanner.handle_key(&KeyEvent::named("Enter", at))
    }

    #[test]
    fn test_handle_key_reports_disposition() {
        let (scanner, count) = counting();
        let outcome = type_burst(&scanner, "SKU-0001", Instant::now());

        assert!(outcome.suppress_default());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(scanner.last_scan().unwrap().code(), "SKU-0001");

        scanner.clear_last_scan();
        assert!(scanner.last_scan().is_none());
    }

    #[test]
    fn test_accepted_scan_vibrates_without_beep() {
        let (feedback, cues) = MockFeedback::new();
        let (scanner, _) = counting();
        let scanner = scanner.with_feedback(Arc::new(feedback));

        type_burst(&scanner, "SKU-0001", Instant::now());

        assert_eq!(cues.events(), vec![FeedbackEvent::Vibrate(100)]);
        assert_eq!(cues.beeps(), 0);
    }

    #[test]
    fn test_rejected_keys_give_no_feedback() {
        let (feedback, cues) = MockFeedback::new();
        let (scanner, count) = counting();
        let scanner = scanner.with_feedback(Arc::new(feedback));
        let start = Instant::now();

        // Too short for the default minimum length
        type_burst(&scanner, "12", start);
        assert_eq!(cues.vibrations(), 0);

        // Accepted, then a second burst inside the debounce window
        type_burst(&scanner, "SKU-0001", start + Duration::from_millis(500));
        type_burst(&scanner, "SKU-0002", start + Duration::from_millis(700));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(cues.vibrations(), 1);
    }

    #[test]
    fn test_not_listening_until_attached() {
        let (scanner, _) = counting();
        assert!(!scanner.is_listening());
    }

    #[test]
    fn test_min_length_override() {
        let (scanner, count) = counting();
        scanner.set_min_length(2);
        type_burst(&scanner, "42", Instant::now());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_attach_detach_lifecycle() {
        let (mut scanner, count) = counting();
        let (tx, rx) = mpsc::channel(16);

        scanner.attach(rx);
        assert!(scanner.is_listening());

        scanner.set_enabled(false);
        assert!(!scanner.is_listening());
        scanner.set_enabled(true);
        assert!(scanner.is_listening());

        let start = Instant::now();
        tx.send(KeyEvent::named("9", start)).await.unwrap();
        tx.send(KeyEvent::named("8", start + Duration::from_millis(5)))
            .await
            .unwrap();
        tokio::task::yield_now().await;

        scanner.detach();
        scanner.detach();
        assert!(!scanner.is_listening());
        assert!(lock(&scanner.shared).decoder.buffer().is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
