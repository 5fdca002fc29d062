use serde::{Deserialize, Serialize};

use super::defaults;

/// Decay prediction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Probability at or above which an intervention is recommended.
    pub recommendation_threshold: f64,
    /// Probability treated as "critical" when estimating days-until-critical.
    pub critical_probability: f64,
    /// Days searched before reporting the critical horizon as unbounded.
    pub horizon_days: u32,
    /// Delay before a non-urgent decay intervention is scheduled (seconds).
    pub lead_secs: u64,
    /// Recall strength added by a successful recall event.
    pub recall_reinforcement: f64,
    pub logistic: LogisticParams,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            recommendation_threshold: defaults::DEFAULT_RECOMMENDATION_THRESHOLD,
            critical_probability: defaults::DEFAULT_CRITICAL_PROBABILITY,
            horizon_days: defaults::DEFAULT_HORIZON_DAYS,
            lead_secs: defaults::DEFAULT_DECAY_LEAD_SECS,
            recall_reinforcement: defaults::DEFAULT_RECALL_REINFORCEMENT,
            logistic: LogisticParams::default(),
        }
    }
}

/// Coefficients of the default logistic blend:
/// `z = intercept + day_rate·days − (strength_weight·s + emotional_weight·e + importance_weight·i)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticParams {
    pub intercept: f64,
    pub day_rate: f64,
    pub strength_weight: f64,
    pub emotional_weight: f64,
    pub importance_weight: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            intercept: defaults::DEFAULT_LOGISTIC_INTERCEPT,
            day_rate: defaults::DEFAULT_LOGISTIC_DAY_RATE,
            strength_weight: defaults::DEFAULT_LOGISTIC_STRENGTH_WEIGHT,
            emotional_weight: defaults::DEFAULT_LOGISTIC_EMOTIONAL_WEIGHT,
            importance_weight: defaults::DEFAULT_LOGISTIC_IMPORTANCE_WEIGHT,
        }
    }
}
