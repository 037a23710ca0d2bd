/// Shared utilities and types used across all layers
///
/// This module contains:
/// - Protocol definitions (remote call requests and results)
/// - Utilities (timestamp)
/// - Prometheus metrics

pub mod metrics;
pub mod protocol;
pub mod timestamp;

// Re-export commonly used types
pub use protocol::{CallRequest, CallResult, Method};
pub use timestamp::unix_timestamp_secs;
