use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use vigil_core::config::ScoringConfig;
use vigil_core::constants::{MAX_RESPONSE, MIN_RESPONSE};
use vigil_core::errors::{ValidationError, VigilResult};
use vigil_core::models::{new_id, Assessment, ScoreResult, ScoreSource, SignalSet};
use vigil_core::traits::IScoreModel;

use crate::classifier::{classify, urgency_for};
use crate::indicators::IndicatorCatalog;
use crate::recommendations::recommend;
use crate::weights::WeightTable;

/// Questionnaire and signal scorer.
///
/// ```text
/// composite = 100 × Σ(wᵢ · nᵢ) / Σ(wᵢ)     over answered indicators
/// nᵢ        = (v − 1) / 4                   risk indicators
///           = (5 − v) / 4                   protective indicators
/// ```
///
/// Composite keeps full precision; sub-scores are rounded to one decimal.
#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    catalog: IndicatorCatalog,
    weights: WeightTable,
}

impl ScoreAggregator {
    pub fn new(catalog: IndicatorCatalog, weights: WeightTable) -> Self {
        Self { catalog, weights }
    }

    /// Burnout catalog with weights from config.
    pub fn from_config(config: &ScoringConfig) -> VigilResult<Self> {
        Ok(Self::new(
            IndicatorCatalog::burnout(),
            WeightTable::from_config(config)?,
        ))
    }

    pub fn catalog(&self) -> &IndicatorCatalog {
        &self.catalog
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Score a questionnaire. Pure: nothing is stored.
    pub fn score_assessment(
        &self,
        assessment: &Assessment,
        now: DateTime<Utc>,
    ) -> VigilResult<ScoreResult> {
        if assessment.responses.is_empty() {
            return Err(ValidationError::EmptyAssessment.into());
        }

        let mut sub_scores = BTreeMap::new();
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for (key, &value) in &assessment.responses {
            let indicator = self.catalog.get(key).ok_or_else(|| {
                ValidationError::UnknownIndicator {
                    indicator: key.clone(),
                }
            })?;
            if !(MIN_RESPONSE..=MAX_RESPONSE).contains(&value) {
                return Err(ValidationError::ResponseOutOfRange {
                    indicator: key.clone(),
                    value,
                }
                .into());
            }
            let normalized = indicator.normalize(value);
            let weight = self.weights.weight(key);
            weighted += weight * normalized;
            total_weight += weight;
            sub_scores.insert(key.clone(), round_one(normalized * 100.0));
        }
        if total_weight <= 0.0 {
            return Err(ValidationError::ZeroTotalWeight.into());
        }

        let composite = (100.0 * weighted / total_weight).clamp(0.0, 100.0);
        debug!(
            subject_id = %assessment.subject_id,
            answered = assessment.responses.len(),
            composite,
            "assessment aggregated"
        );
        Ok(self.finish(
            &assessment.subject_id,
            ScoreSource::Assessment {
                assessment_id: assessment.id.clone(),
            },
            composite,
            sub_scores,
            now,
        ))
    }

    /// Score raw features through an injected model. Composite = 100 × probability.
    pub fn score_signals(
        &self,
        signals: &SignalSet,
        model: &dyn IScoreModel,
        now: DateTime<Utc>,
    ) -> VigilResult<ScoreResult> {
        if signals.features.is_empty() {
            return Err(ValidationError::EmptySignalSet.into());
        }
        for (key, &value) in &signals.features {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::AttributeOutOfRange {
                    field: key.clone(),
                    value,
                }
                .into());
            }
        }

        let probability = model.probability(&signals.features);
        if !(0.0..=1.0).contains(&probability) {
            return Err(ValidationError::ModelOutOfRange { value: probability }.into());
        }

        let sub_scores = signals
            .features
            .iter()
            .map(|(k, v)| (k.clone(), round_one(v * 100.0)))
            .collect();
        Ok(self.finish(
            &signals.subject_id,
            ScoreSource::Signals {
                signal_set_id: signals.id.clone(),
                model: model.name().to_string(),
            },
            probability * 100.0,
            sub_scores,
            now,
        ))
    }

    fn finish(
        &self,
        subject_id: &str,
        source: ScoreSource,
        composite: f64,
        sub_scores: BTreeMap<String, f64>,
        now: DateTime<Utc>,
    ) -> ScoreResult {
        let tier = classify(composite);
        ScoreResult {
            id: new_id(),
            subject_id: subject_id.to_string(),
            source,
            composite,
            recommendations: recommend(tier, &sub_scores),
            sub_scores,
            tier,
            urgency: urgency_for(tier),
            created_at: now,
        }
    }
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
