//! Prometheus metrics and structured logging for the regime monitor.
//!
//! - Prometheus metrics for fetches, cache lookups, indicator values and decisions
//! - Structured JSON logging with tracing

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
