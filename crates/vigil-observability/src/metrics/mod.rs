//! Central metrics registry.
//!
//! [`MetricsCollector`] owns the per-area collectors. The engine keeps one
//! behind a lock and hands out serialized snapshots.

pub mod intervention_metrics;
pub mod scoring_metrics;
pub mod sweep_metrics;

pub use intervention_metrics::InterventionMetrics;
pub use scoring_metrics::ScoringMetrics;
pub use sweep_metrics::SweepMetrics;

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MetricsCollector {
    pub scoring: ScoringMetrics,
    pub interventions: InterventionMetrics,
    pub sweeps: SweepMetrics,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// JSON snapshot for an external status endpoint.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
