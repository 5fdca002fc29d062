use std::collections::HashMap;

use vigil_core::config::ScoringConfig;
use vigil_core::errors::{ValidationError, VigilResult};

/// Indicator → non-negative weight. Weights need not sum to 1.
#[derive(Debug, Clone)]
pub struct WeightTable {
    default_weight: f64,
    overrides: HashMap<String, f64>,
}

impl WeightTable {
    /// Every indicator weighs the same.
    pub fn uniform() -> Self {
        Self {
            default_weight: 1.0,
            overrides: HashMap::new(),
        }
    }

    pub fn from_config(config: &ScoringConfig) -> VigilResult<Self> {
        let mut table = Self {
            default_weight: check("*", config.default_weight)?,
            overrides: HashMap::with_capacity(config.weights.len()),
        };
        for (key, weight) in &config.weights {
            table = table.with_weight(key.clone(), *weight)?;
        }
        Ok(table)
    }

    /// Override one indicator's weight.
    pub fn with_weight(mut self, key: impl Into<String>, weight: f64) -> VigilResult<Self> {
        let key = key.into();
        let weight = check(&key, weight)?;
        self.overrides.insert(key, weight);
        Ok(self)
    }

    pub fn weight(&self, key: &str) -> f64 {
        self.overrides
            .get(key)
            .copied()
            .unwrap_or(self.default_weight)
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::uniform()
    }
}

fn check(indicator: &str, weight: f64) -> VigilResult<f64> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(ValidationError::InvalidWeight {
            indicator: indicator.to_string(),
            weight,
        }
        .into())
    }
}
