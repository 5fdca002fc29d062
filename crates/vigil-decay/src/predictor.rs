use std::sync::Arc;

use chrono::{DateTime, Utc};

use vigil_core::config::DecayConfig;
use vigil_core::constants::DECAY_PROJECTION_DAYS;
use vigil_core::models::{DecayInput, DecayPrediction, DecayRiskLevel, MemoryEntity, StrengthProjection};
use vigil_core::traits::IDecayStrategy;

use crate::horizon;
use crate::strategy::LogisticBlend;

/// Produces a [`DecayPrediction`] from a memory's current attributes.
/// Pure; safe to call from any thread without locking.
#[derive(Clone)]
pub struct DecayPredictor {
    strategy: Arc<dyn IDecayStrategy>,
    recommendation_threshold: f64,
    critical_probability: f64,
    horizon_days: u32,
}

impl DecayPredictor {
    pub fn new(strategy: Arc<dyn IDecayStrategy>, config: &DecayConfig) -> Self {
        Self {
            strategy,
            recommendation_threshold: config.recommendation_threshold,
            critical_probability: config.critical_probability,
            horizon_days: config.horizon_days,
        }
    }

    /// Logistic blend with the configured parameters.
    pub fn from_config(config: &DecayConfig) -> Self {
        Self::new(Arc::new(LogisticBlend::new(config.logistic)), config)
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn recommendation_threshold(&self) -> f64 {
        self.recommendation_threshold
    }

    /// Raw probability for an input, clamped to [0, 1].
    pub fn probability(&self, input: &DecayInput) -> f64 {
        let p = self.strategy.probability(input);
        if p.is_nan() {
            0.0
        } else {
            p.clamp(0.0, 1.0)
        }
    }

    pub fn predict(&self, entity: &MemoryEntity, now: DateTime<Utc>) -> DecayPrediction {
        let input = DecayInput::from_entity(entity, now);
        let probability = self.probability(&input);
        let days_until_critical = horizon::days_until(
            self.strategy.as_ref(),
            &input,
            self.critical_probability,
            self.horizon_days,
        );
        let projections = DECAY_PROJECTION_DAYS
            .iter()
            .map(|&days_ahead| {
                let future = self.probability(&input.aged_by(f64::from(days_ahead)));
                StrengthProjection {
                    days_ahead,
                    recall_strength: (entity.recall_strength * (1.0 - future)).clamp(0.0, 1.0),
                }
            })
            .collect();

        DecayPrediction {
            memory_id: entity.id.clone(),
            subject_id: entity.subject_id.clone(),
            probability,
            days_until_critical,
            intervention_recommended: probability >= self.recommendation_threshold,
            risk_level: DecayRiskLevel::from_probability(probability),
            projections,
            strategy: self.strategy.name().to_string(),
            computed_at: now,
        }
    }
}

impl Default for DecayPredictor {
    fn default() -> Self {
        Self::from_config(&DecayConfig::default())
    }
}

impl std::fmt::Debug for DecayPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecayPredictor")
            .field("strategy", &self.strategy.name())
            .field("recommendation_threshold", &self.recommendation_threshold)
            .field("critical_probability", &self.critical_probability)
            .field("horizon_days", &self.horizon_days)
            .finish()
    }
}
