//! Concrete detection backends, one per tier.

pub mod jsqr;
pub mod native;
pub mod zbar;

pub use jsqr::{JsqrEngine, RqrrDecoder};
pub use native::NativeEngine;
pub use zbar::{ZbarEngine, ZbarPayload};
