//! Engine factory configuration.

use serde::{Deserialize, Serialize};
use stockscan_core::EngineKind;

use crate::backends::native::default_required_formats;

/// Configuration for [`EngineFactory`](crate::factory::EngineFactory).
///
/// # Examples
///
/// ```
/// use stockscan_engine::FactoryConfig;
///
/// let config: FactoryConfig = serde_json::from_str(r#"{"preferred": "zbar"}"#).unwrap();
/// assert_eq!(config.required_native_formats, vec!["QR_CODE", "EAN_13"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Force a tier instead of walking the fallback cascade.
    pub preferred: Option<EngineKind>,

    /// Canonical formats the platform detector must cover.
    pub required_native_formats: Vec<String>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            preferred: None,
            required_native_formats: default_required_formats(),
        }
    }
}
