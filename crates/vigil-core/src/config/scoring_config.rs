use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Score aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub default_weight: f64,
    /// Per-indicator weight overrides. Indicators not listed use `default_weight`.
    pub weights: HashMap<String, f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_weight: defaults::DEFAULT_INDICATOR_WEIGHT,
            weights: HashMap::new(),
        }
    }
}
