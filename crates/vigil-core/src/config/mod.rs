pub mod defaults;
mod decay_config;
mod observability_config;
mod runtime_config;
mod scheduler_config;
mod scoring_config;
mod storage_config;
mod trend_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use decay_config::{DecayConfig, LogisticParams};
pub use observability_config::ObservabilityConfig;
pub use runtime_config::RuntimeConfig;
pub use scheduler_config::SchedulerConfig;
pub use scoring_config::ScoringConfig;
pub use storage_config::StorageConfig;
pub use trend_config::TrendConfig;

use crate::constants::{MAX_CONFIG_SPAN_DAYS, MAX_CONFIG_SPAN_SECS};
use crate::errors::{VigilError, VigilResult};

/// Top-level configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    pub scoring: ScoringConfig,
    pub decay: DecayConfig,
    pub scheduler: SchedulerConfig,
    pub trends: TrendConfig,
    pub runtime: RuntimeConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl VigilConfig {
    /// Parse from TOML. Missing sections and fields take defaults.
    pub fn from_toml(source: &str) -> VigilResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| VigilError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> VigilResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| VigilError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&source)
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> VigilResult<()> {
        let unit = |name: &str, v: f64| -> VigilResult<()> {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(VigilError::Config(format!("{name} must be in 0.0-1.0, got {v}")))
            }
        };
        unit("decay.recommendation_threshold", self.decay.recommendation_threshold)?;
        unit("decay.critical_probability", self.decay.critical_probability)?;
        unit("decay.recall_reinforcement", self.decay.recall_reinforcement)?;

        let logistic = &self.decay.logistic;
        if !logistic.day_rate.is_finite() || logistic.day_rate <= 0.0 {
            return Err(VigilError::Config(
                "decay.logistic.day_rate must be positive".to_string(),
            ));
        }
        if !logistic.intercept.is_finite() {
            return Err(VigilError::Config(
                "decay.logistic.intercept must be finite".to_string(),
            ));
        }
        for (name, w) in [
            ("strength_weight", logistic.strength_weight),
            ("emotional_weight", logistic.emotional_weight),
            ("importance_weight", logistic.importance_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(VigilError::Config(format!(
                    "decay.logistic.{name} must be non-negative, got {w}"
                )));
            }
        }
        if i64::from(self.decay.horizon_days) > MAX_CONFIG_SPAN_DAYS {
            return Err(VigilError::Config(format!(
                "decay.horizon_days must be at most {MAX_CONFIG_SPAN_DAYS}"
            )));
        }

        for (name, secs) in [
            ("decay.lead_secs", self.decay.lead_secs),
            ("scheduler.backoff_base_secs", self.scheduler.backoff_base_secs),
            ("scheduler.backoff_cap_secs", self.scheduler.backoff_cap_secs),
            ("scheduler.dispatch_timeout_ms", self.scheduler.dispatch_timeout_ms / 1_000),
            ("scheduler.assessment_lead_secs", self.scheduler.assessment_lead_secs),
            ("scheduler.confirmation_window_secs", self.scheduler.confirmation_window_secs),
            ("runtime.sweep_interval_secs", self.runtime.sweep_interval_secs),
        ] {
            if secs > MAX_CONFIG_SPAN_SECS {
                return Err(VigilError::Config(format!(
                    "{name} must span at most {MAX_CONFIG_SPAN_SECS} seconds"
                )));
            }
        }
        if self.scoring.default_weight < 0.0
            || self.scoring.weights.values().any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(VigilError::Config(
                "scoring weights must be non-negative".to_string(),
            ));
        }
        if self.scheduler.backoff_factor < 1 {
            return Err(VigilError::Config(
                "scheduler.backoff_factor must be at least 1".to_string(),
            ));
        }
        if self.scheduler.dispatch_timeout_ms == 0 {
            return Err(VigilError::Config(
                "scheduler.dispatch_timeout_ms must be positive".to_string(),
            ));
        }
        if self.trends.default_window_days < 1 || self.trends.retention_days < 1 {
            return Err(VigilError::Config(
                "trend windows must be at least one day".to_string(),
            ));
        }
        if self.trends.default_window_days > MAX_CONFIG_SPAN_DAYS
            || self.trends.retention_days > MAX_CONFIG_SPAN_DAYS
        {
            return Err(VigilError::Config(format!(
                "trend windows must be at most {MAX_CONFIG_SPAN_DAYS} days"
            )));
        }
        if self.trends.noise_margin < 0.0 {
            return Err(VigilError::Config(
                "trends.noise_margin must be non-negative".to_string(),
            ));
        }
        if self.runtime.worker_count == 0 || self.runtime.event_buffer == 0 {
            return Err(VigilError::Config(
                "runtime.worker_count and runtime.event_buffer must be positive".to_string(),
            ));
        }
        if self.runtime.sweep_interval_secs == 0 {
            return Err(VigilError::Config(
                "runtime.sweep_interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
