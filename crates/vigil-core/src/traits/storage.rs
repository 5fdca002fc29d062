use chrono::{DateTime, Utc};

use crate::errors::VigilResult;
use crate::models::{
    Assessment, Intervention, InterventionStatus, MemoryEntity, MemoryRelation, ScoreResult,
    SignalSet, Subject,
};

/// Everything written by one scoring request. Committed all-or-nothing.
#[derive(Debug, Clone, Copy)]
pub struct ScoreCommit<'a> {
    pub assessment: Option<&'a Assessment>,
    pub signals: Option<&'a SignalSet>,
    pub score: &'a ScoreResult,
    /// New or coalesced interventions produced by this score.
    pub interventions: &'a [Intervention],
}

/// Persistence boundary for all subject-scoped records.
pub trait IVigilStorage: Send + Sync {
    // --- Subjects ---
    fn upsert_subject(&self, subject: &Subject) -> VigilResult<()>;
    fn get_subject(&self, id: &str) -> VigilResult<Option<Subject>>;
    fn list_subjects(&self) -> VigilResult<Vec<Subject>>;

    // --- Scores ---
    fn commit_score(&self, commit: ScoreCommit<'_>) -> VigilResult<()>;
    fn get_assessment(&self, id: &str) -> VigilResult<Option<Assessment>>;
    fn score_results(
        &self,
        subject_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> VigilResult<Vec<ScoreResult>>;

    // --- Memory graph ---
    fn upsert_memory(&self, entity: &MemoryEntity) -> VigilResult<()>;
    fn list_memories(&self, subject_id: &str) -> VigilResult<Vec<MemoryEntity>>;
    fn upsert_relation(&self, relation: &MemoryRelation) -> VigilResult<()>;
    fn list_relations(&self, subject_id: &str) -> VigilResult<Vec<MemoryRelation>>;

    // --- Interventions ---
    fn upsert_interventions(&self, interventions: &[Intervention]) -> VigilResult<()>;
    fn list_interventions(
        &self,
        subject_id: &str,
        status: Option<InterventionStatus>,
    ) -> VigilResult<Vec<Intervention>>;
}
