//! Mock ZBar payload and software decoder.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};

use super::lock;
use crate::error::{EngineError, Result};
use crate::traits::{LinearDecoder, LinearSymbol, MatrixDecoder, MatrixHit, PayloadLoader};

/// Shared count of payload loads.
#[derive(Debug, Clone, Default)]
pub struct LoadCounter(Arc<AtomicUsize>);

impl LoadCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn increment(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Simulated ZBar decoder. Each scan pops the next queued symbol set.
#[derive(Debug, Default)]
pub struct MockLinearDecoder {
    queued: Mutex<VecDeque<Vec<LinearSymbol>>>,
}

impl MockLinearDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the symbols the next scan reports.
    pub fn push_symbols(&self, symbols: Vec<LinearSymbol>) {
        lock(&self.queued).push_back(symbols);
    }
}

impl LinearDecoder for MockLinearDecoder {
    fn scan_grayscale(&self, _luma: &[u8], _width: u32, _height: u32) -> Result<Vec<LinearSymbol>> {
        Ok(lock(&self.queued).pop_front().unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
enum Failure {
    None,
    Once(String),
    Always(String),
}

/// Simulated payload fetch.
///
/// Loads yield briefly so concurrent callers genuinely overlap.
#[derive(Debug)]
pub struct MockPayloadLoader {
    decoder: Arc<MockLinearDecoder>,
    failure: Mutex<Failure>,
    loads: LoadCounter,
}

impl MockPayloadLoader {
    pub fn new(decoder: MockLinearDecoder) -> Self {
        Self {
            decoder: Arc::new(decoder),
            failure: Mutex::new(Failure::None),
            loads: LoadCounter::default(),
        }
    }

    /// Make only the next load fail.
    pub fn fail_next(&self, message: impl Into<String>) {
        *lock(&self.failure) = Failure::Once(message.into());
    }

    /// Make every load fail.
    pub fn fail_always(&self, message: impl Into<String>) {
        *lock(&self.failure) = Failure::Always(message.into());
    }

    /// The decoder handed out on a successful load.
    pub fn decoder(&self) -> Arc<MockLinearDecoder> {
        Arc::clone(&self.decoder)
    }

    pub fn load_count(&self) -> usize {
        self.loads.get()
    }

    pub fn load_counter(&self) -> LoadCounter {
        self.loads.clone()
    }
}

impl PayloadLoader for MockPayloadLoader {
    fn load(&self) -> BoxFuture<'_, Result<Arc<dyn LinearDecoder>>> {
        async move {
            self.loads.increment();
            tokio::time::sleep(Duration::from_millis(5)).await;

            let failure = {
                let mut slot = lock(&self.failure);
                let current = slot.clone();
                if matches!(current, Failure::Once(_)) {
                    *slot = Failure::None;
                }
                current
            };

            match failure {
                Failure::None => Ok(Arc::clone(&self.decoder) as Arc<dyn LinearDecoder>),
                Failure::Once(message) | Failure::Always(message) => {
                    Err(EngineError::payload_load(message))
                }
            }
        }
        .boxed()
    }
}

/// Simulated software decoder that records every image it is given.
#[derive(Debug, Default)]
pub struct MockMatrixDecoder {
    queued: Mutex<VecDeque<Vec<MatrixHit>>>,
    seen: Mutex<Vec<Vec<u8>>>,
}

impl MockMatrixDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the hits the next decode call reports.
    pub fn push_hits(&self, hits: Vec<MatrixHit>) {
        lock(&self.queued).push_back(hits);
    }

    /// Grayscale images passed to `decode`, in call order.
    pub fn seen_luma(&self) -> Vec<Vec<u8>> {
        lock(&self.seen).clone()
    }
}

impl MatrixDecoder for MockMatrixDecoder {
    fn decode(&self, luma: &[u8], _width: u32, _height: u32) -> Vec<MatrixHit> {
        lock(&self.seen).push(luma.to_vec());
        lock(&self.queued).pop_front().unwrap_or_default()
    }
}
