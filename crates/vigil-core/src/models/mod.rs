pub mod assessment;
pub mod decay_prediction;
pub mod events;
pub mod intervention;
pub mod memory;
pub mod relation;
pub mod score;
pub mod signals;
pub mod subject;
pub mod trend;

pub use assessment::Assessment;
pub use decay_prediction::{CriticalHorizon, DecayInput, DecayPrediction, DecayRiskLevel, StrengthProjection};
pub use events::InterventionDueEvent;
pub use intervention::{
    Intervention, InterventionAction, InterventionOutcome, InterventionStatus, InterventionTrigger,
    InterventionType,
};
pub use memory::{MemoryEntity, MemoryType};
pub use relation::{MemoryRelation, RelationType};
pub use score::{
    Recommendation, RecommendationCategory, RecommendationPriority, RiskTier, ScoreResult,
    ScoreSource, Urgency,
};
pub use signals::SignalSet;
pub use subject::{Subject, SubjectKind};
pub use trend::{ScorePoint, TrendDirection, TrendReport, TrendSummary};

/// Fresh UUID v4 string for a new record.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
