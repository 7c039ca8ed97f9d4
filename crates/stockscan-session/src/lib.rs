//! Camera scan session for the stockscan pipeline.
//!
//! [`ScanSession`] ties a [`CameraManager`](stockscan_camera::CameraManager)
//! and an engine from [`EngineFactory`](stockscan_engine::EngineFactory)
//! together: `start` acquires both, `poll_once`/`next_scan` turn frames
//! into debounced [`ScanResult`](stockscan_core::ScanResult)s, `stop`
//! releases everything. Results are also broadcast to
//! [`subscribe`](ScanSession::subscribe)rs.

pub mod config;
pub mod error;
pub mod session;
pub mod state;

pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use session::{ScanSession, StopHandle};
pub use state::SessionState;
