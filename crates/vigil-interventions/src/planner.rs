use chrono::{DateTime, Duration, Utc};

use vigil_core::clock::{saturating_add, secs_saturating};
use vigil_core::config::{DecayConfig, SchedulerConfig};
use vigil_core::constants::IMMEDIATE_HORIZON_DAYS;
use vigil_core::models::{
    DecayPrediction, Intervention, InterventionTrigger, MemoryEntity, RiskTier, ScoreResult,
};

use crate::policy;

/// Turns a score or decay prediction into a candidate intervention.
/// Candidates are not yet in any book; see [`SubjectBook::propose`](crate::SubjectBook::propose).
#[derive(Debug, Clone, Copy)]
pub struct InterventionPlanner {
    assessment_lead: Duration,
    decay_lead: Duration,
}

impl InterventionPlanner {
    pub fn new(assessment_lead: Duration, decay_lead: Duration) -> Self {
        Self {
            assessment_lead,
            decay_lead,
        }
    }

    pub fn from_config(scheduler: &SchedulerConfig, decay: &DecayConfig) -> Self {
        Self::new(
            secs_saturating(scheduler.assessment_lead_secs),
            secs_saturating(decay.lead_secs),
        )
    }

    /// Tier `high` or above yields a candidate. Critical is due now, high after the lead time.
    pub fn for_score(&self, score: &ScoreResult, now: DateTime<Utc>) -> Option<Intervention> {
        let scheduled_for = match score.tier {
            RiskTier::Critical => now,
            RiskTier::High => saturating_add(now, self.assessment_lead),
            RiskTier::Moderate | RiskTier::Low => return None,
        };
        let (intervention_type, indicator) = policy::for_score(score);
        Some(Intervention::new(
            &score.subject_id,
            intervention_type,
            InterventionTrigger::Assessment {
                score_id: score.id.clone(),
                tier: score.tier,
                indicator: indicator.map(str::to_string),
            },
            policy::assessment_title(intervention_type),
            scheduled_for,
            now,
        ))
    }

    /// A recommended prediction yields a candidate. Memories close to the
    /// critical horizon are due now, others after the decay lead time.
    pub fn for_decay(
        &self,
        memory: &MemoryEntity,
        prediction: &DecayPrediction,
        anchors: Vec<String>,
        now: DateTime<Utc>,
    ) -> Option<Intervention> {
        if !prediction.intervention_recommended {
            return None;
        }
        let urgent = prediction
            .days_until_critical
            .days()
            .is_some_and(|d| d <= IMMEDIATE_HORIZON_DAYS);
        let scheduled_for = if urgent {
            now
        } else {
            saturating_add(now, self.decay_lead)
        };
        let intervention_type = policy::for_decay(memory);
        let mut candidate = Intervention::new(
            &memory.subject_id,
            intervention_type,
            InterventionTrigger::Decay {
                memory_id: memory.id.clone(),
                probability: prediction.probability,
            },
            policy::decay_title(intervention_type, &memory.name),
            scheduled_for,
            now,
        );
        candidate.anchors = anchors;
        Some(candidate)
    }
}

impl Default for InterventionPlanner {
    fn default() -> Self {
        Self::from_config(&SchedulerConfig::default(), &DecayConfig::default())
    }
}
