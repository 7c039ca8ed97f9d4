//! Engine lifecycle and capability types.

use serde::{Deserialize, Serialize};
use stockscan_core::EngineKind;

/// Lifecycle state of a [`ScannerEngine`](crate::traits::ScannerEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// Constructed, no resources held.
    Uninitialized,

    /// Resources acquired; `detect` is legal.
    Ready,

    /// Resources released; terminal.
    Disposed,
}

/// Load state of the shared ZBar payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadState {
    /// Not requested yet, or the last attempt failed.
    Unloaded,

    /// A load is in flight.
    Loading,

    /// Decoder instantiated and cached.
    Ready,
}

/// Result of checking the host runtime for each backend tier.
///
/// Recomputed on every detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineCapabilities {
    /// Platform detector present and covering the required formats.
    pub native: bool,

    /// Runtime can host the ZBar payload.
    pub zbar: bool,

    /// Software tier. Always `true`.
    pub jsqr: bool,

    /// Highest-ranked supported tier.
    pub recommended: EngineKind,
}

impl EngineCapabilities {
    /// Build capabilities from the two support checks.
    pub fn new(native: bool, zbar: bool) -> Self {
        let recommended = if native {
            EngineKind::Native
        } else if zbar {
            EngineKind::Zbar
        } else {
            EngineKind::Jsqr
        };

        Self {
            native,
            zbar,
            jsqr: true,
            recommended,
        }
    }

    /// Whether a given tier is supported.
    pub fn supports(&self, kind: EngineKind) -> bool {
        match kind {
            EngineKind::Native => self.native,
            EngineKind::Zbar => self.zbar,
            EngineKind::Jsqr => self.jsqr,
        }
    }

    /// Supported tiers, best first. Always ends with the software tier.
    pub fn ranked(&self) -> Vec<EngineKind> {
        EngineKind::RANKED
            .into_iter()
            .filter(|kind| self.supports(*kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true, true, EngineKind::Native)]
    #[case(true, false, EngineKind::Native)]
    #[case(false, true, EngineKind::Zbar)]
    #[case(false, false, EngineKind::Jsqr)]
    fn test_recommended_is_highest_supported(
        #[case] native: bool,
        #[case] zbar: bool,
        #[case] expected: EngineKind,
    ) {
        let caps = EngineCapabilities::new(native, zbar);
        assert_eq!(caps.recommended, expected);
        assert_eq!(caps.ranked().first(), Some(&expected));
        assert_eq!(caps.ranked().last(), Some(&EngineKind::Jsqr));
    }

    #[test]
    fn test_ranked_skips_unsupported() {
        let caps = EngineCapabilities::new(false, true);
        assert_eq!(caps.ranked(), vec![EngineKind::Zbar, EngineKind::Jsqr]);
    }

    #[test]
    fn test_capabilities_serialization() {
        let caps = EngineCapabilities::new(false, true);
        let json = serde_json::to_string(&caps).unwrap();
        assert!(json.contains("\"recommended\":\"zbar\""));
    }
}
