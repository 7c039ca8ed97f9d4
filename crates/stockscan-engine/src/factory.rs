//! Capability detection and ranked engine selection.
//!
//! ```text
//!   preferred? ──yes──► build + initialize ──► Ok / Err (propagated)
//!       │
//!       no
//!       ▼
//!   detect ──► native ──fail──► zbar ──fail──► jsqr (cannot fail)
//! ```
//!
//! Initialization failures inside the cascade are logged and absorbed; the
//! software tier always terminates the chain.

use std::fmt;
use std::sync::{Arc, Mutex};

use stockscan_core::EngineKind;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backends::{JsqrEngine, NativeEngine, ZbarEngine, ZbarPayload};
use crate::config::FactoryConfig;
use crate::dispatch::AnyScannerEngine;
use crate::error::{EngineError, Result};
use crate::traits::{Platform, ScannerEngine};
use crate::types::{EngineCapabilities, PayloadState};

/// Builds engines for the host platform.
///
/// Cloning is cheap; clones share the platform handle and the cached ZBar
/// payload.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use stockscan_core::EngineKind;
/// use stockscan_engine::{EngineFactory, FactoryConfig};
/// use stockscan_engine::mock::MockPlatform;
/// use stockscan_engine::traits::ScannerEngine;
///
/// #[tokio::main]
/// async fn main() -> stockscan_engine::Result<()> {
///     let platform = MockPlatform::builder().build();
///     let factory = EngineFactory::new(Arc::new(platform), FactoryConfig::default());
///
///     let engine = factory.create_engine(None).await?;
///     assert_eq!(engine.kind(), EngineKind::Jsqr);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct EngineFactory {
    platform: Arc<dyn Platform>,
    config: FactoryConfig,
    payload: Arc<Mutex<Option<Arc<ZbarPayload>>>>,
}

impl EngineFactory {
    pub fn new(platform: Arc<dyn Platform>, config: FactoryConfig) -> Self {
        Self {
            platform,
            config,
            payload: Arc::new(Mutex::new(None)),
        }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Check the platform for every tier. Never cached.
    pub async fn detect_capabilities(&self) -> EngineCapabilities {
        let native = self.native_engine().is_supported().await;
        let zbar = self.platform.payload_loader().is_some();
        let caps = EngineCapabilities::new(native, zbar);
        debug!(?caps, "Engine capabilities detected");
        caps
    }

    /// Highest-ranked tier the platform supports.
    pub async fn recommended_engine(&self) -> EngineKind {
        self.detect_capabilities().await.recommended
    }

    /// Build and initialize an engine.
    ///
    /// With a preference (argument first, then config), exactly that tier is
    /// tried and its failure is returned. Without one, tiers are tried best
    /// first and failures fall through to the next tier.
    ///
    /// # Errors
    ///
    /// Only a forced tier can fail; the cascade always ends in the software
    /// tier.
    pub async fn create_engine(&self, preferred: Option<EngineKind>) -> Result<AnyScannerEngine> {
        if let Some(kind) = preferred.or(self.config.preferred) {
            info!(engine = kind.tier_id(), "Creating forced engine");
            let mut engine = self.build(kind);
            engine.initialize().await?;
            return Ok(engine);
        }

        let caps = self.detect_capabilities().await;
        for kind in caps.ranked() {
            let mut engine = self.build(kind);
            match engine.initialize().await {
                Ok(()) => {
                    info!(engine = engine.name(), "Engine selected");
                    return Ok(engine);
                }
                Err(e) => {
                    warn!(
                        engine = kind.tier_id(),
                        error = %e,
                        "Engine failed to initialize, falling back"
                    );
                    engine.dispose();
                }
            }
        }

        Err(EngineError::initialization_failed("No detection engine could be initialized"))
    }

    /// Start loading the ZBar payload in the background when it is going to
    /// be the selected tier.
    ///
    /// Returns `None` without doing anything when called outside a Tokio
    /// runtime. Load failures are logged and leave the payload retryable.
    pub fn preload(&self) -> Option<JoinHandle<()>> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                debug!("No runtime, skipping engine preload");
                return None;
            }
        };

        let factory = self.clone();
        Some(runtime.spawn(async move {
            let caps = factory.detect_capabilities().await;
            if caps.recommended != EngineKind::Zbar {
                debug!(recommended = caps.recommended.tier_id(), "Preload not needed");
                return;
            }

            if let Some(payload) = factory.zbar_payload() {
                if let Err(e) = payload.get().await {
                    warn!(error = %e, "Background payload preload failed");
                }
            }
        }))
    }

    /// Load state of the shared ZBar payload.
    pub fn payload_state(&self) -> PayloadState {
        self.lock_payload()
            .as_ref()
            .map_or(PayloadState::Unloaded, |payload| payload.state())
    }

    fn build(&self, kind: EngineKind) -> AnyScannerEngine {
        match kind {
            EngineKind::Native => self.native_engine().into(),
            EngineKind::Zbar => ZbarEngine::new(self.zbar_payload()).into(),
            EngineKind::Jsqr => JsqrEngine::new().into(),
        }
    }

    fn native_engine(&self) -> NativeEngine {
        NativeEngine::new(
            self.platform.native_detector(),
            self.config.required_native_formats.clone(),
        )
    }

    fn zbar_payload(&self) -> Option<Arc<ZbarPayload>> {
        let mut slot = self.lock_payload();
        if let Some(payload) = slot.as_ref() {
            return Some(Arc::clone(payload));
        }

        let payload = Arc::new(ZbarPayload::new(self.platform.payload_loader()?));
        *slot = Some(Arc::clone(&payload));
        Some(payload)
    }

    fn lock_payload(&self) -> std::sync::MutexGuard<'_, Option<Arc<ZbarPayload>>> {
        self.payload
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for EngineFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineFactory")
            .field("config", &self.config)
            .field("payload_state", &self.payload_state())
            .finish()
    }
}
