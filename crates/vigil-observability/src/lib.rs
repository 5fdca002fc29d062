//! # vigil-observability
//!
//! Tracing subscriber setup, structured event helpers, span macros, and the
//! metrics collector the engine updates as it scores and dispatches.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::MetricsCollector;
