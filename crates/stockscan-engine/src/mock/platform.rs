//! Mock host runtime.

use std::sync::Arc;

use super::{
    LoadCounter, MockLinearDecoder, MockNativeDetector, MockNativeHandle, MockPayloadLoader,
};
use crate::traits::{NativeDetector, PayloadLoader, Platform};

/// Simulated host runtime with configurable tier availability.
///
/// # Examples
///
/// ```
/// use stockscan_engine::mock::MockPlatform;
///
/// // Platform detector missing, ZBar payload loadable
/// let platform = MockPlatform::builder().zbar().build();
/// assert!(platform.native_handle().is_none());
/// ```
#[derive(Debug)]
pub struct MockPlatform {
    native: Option<Arc<MockNativeDetector>>,
    native_handle: Option<MockNativeHandle>,
    loader: Option<Arc<MockPayloadLoader>>,
}

impl MockPlatform {
    pub fn builder() -> MockPlatformBuilder {
        MockPlatformBuilder::default()
    }

    /// Handle for scripting the platform detector, if present.
    pub fn native_handle(&self) -> Option<MockNativeHandle> {
        self.native_handle.clone()
    }

    /// The ZBar decoder handed out by the payload loader, if present.
    pub fn zbar_decoder(&self) -> Option<Arc<MockLinearDecoder>> {
        self.loader.as_ref().map(|loader| loader.decoder())
    }

    /// Payload load counter. Stays at zero without a loader.
    pub fn load_counter(&self) -> LoadCounter {
        self.loader
            .as_ref()
            .map(|loader| loader.load_counter())
            .unwrap_or_default()
    }
}

impl Platform for MockPlatform {
    fn native_detector(&self) -> Option<Arc<dyn NativeDetector>> {
        self.native
            .as_ref()
            .map(|detector| Arc::clone(detector) as Arc<dyn NativeDetector>)
    }

    fn payload_loader(&self) -> Option<Arc<dyn PayloadLoader>> {
        self.loader
            .as_ref()
            .map(|loader| Arc::clone(loader) as Arc<dyn PayloadLoader>)
    }
}

/// Builder for [`MockPlatform`].
#[derive(Debug, Default)]
pub struct MockPlatformBuilder {
    native_formats: Option<Vec<String>>,
    native_configure_failure: Option<String>,
    zbar: bool,
    zbar_failure: Option<String>,
}

impl MockPlatformBuilder {
    /// Expose a platform detector supporting these platform format names.
    pub fn native(mut self, formats: &[&str]) -> Self {
        self.native_formats = Some(formats.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Make the platform detector fail to construct.
    pub fn native_configure_failure(mut self, message: impl Into<String>) -> Self {
        self.native_configure_failure = Some(message.into());
        self
    }

    /// Make the ZBar payload loadable.
    pub fn zbar(mut self) -> Self {
        self.zbar = true;
        self
    }

    /// Make the ZBar payload present but every load fail.
    pub fn zbar_load_failure(mut self, message: impl Into<String>) -> Self {
        self.zbar = true;
        self.zbar_failure = Some(message.into());
        self
    }

    pub fn build(self) -> MockPlatform {
        let (native, native_handle) = match self.native_formats {
            Some(formats) => {
                let names: Vec<&str> = formats.iter().map(String::as_str).collect();
                let (mut detector, handle) = MockNativeDetector::new(&names);
                if let Some(message) = self.native_configure_failure {
                    detector = detector.with_configure_failure(message);
                }
                (Some(Arc::new(detector)), Some(handle))
            }
            None => (None, None),
        };

        let loader = self.zbar.then(|| {
            let loader = MockPayloadLoader::new(MockLinearDecoder::new());
            if let Some(message) = &self.zbar_failure {
                loader.fail_always(message.clone());
            }
            Arc::new(loader)
        });

        MockPlatform {
            native,
            native_handle,
            loader,
        }
    }
}
