//! # vigil-core
//!
//! Foundation crate for the Vigil risk scoring and intervention engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::VigilConfig;
pub use errors::{VigilError, VigilResult};
pub use models::{
    Assessment, DecayPrediction, Intervention, InterventionStatus, InterventionType,
    MemoryEntity, MemoryRelation, MemoryType, RelationType, RiskTier, ScoreResult, Subject,
    SubjectKind, Urgency,
};
