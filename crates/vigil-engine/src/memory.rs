//! Memory graph operations and decay evaluation for patients.
//!
//! Mutations go to storage while the subject's graph lock is held, and the
//! graph only changes once storage accepted the write.

use serde::Serialize;

use vigil_core::constants::MAX_INTERVENTION_ANCHORS;
use vigil_core::errors::{ValidationError, VigilResult};
use vigil_core::models::{DecayPrediction, Intervention, MemoryEntity, MemoryRelation, RelationType};
use vigil_graph::Neighbor;
use vigil_observability::graph_span;

use crate::engine::VigilEngine;

/// Decay outlook for one memory and the intervention it led to, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryEvaluation {
    pub prediction: DecayPrediction,
    pub intervention: Option<Intervention>,
    pub coalesced: bool,
}

impl VigilEngine {
    pub fn upsert_memory(&self, entity: MemoryEntity) -> VigilResult<MemoryEntity> {
        let _span = graph_span!(entity.subject_id, "upsert_memory").entered();
        self.active_graph_owner(&entity.subject_id)?;
        self.graphs
            .upsert_entity_then(entity, |stored| self.storage.upsert_memory(stored))
    }

    pub fn upsert_relation(&self, relation: MemoryRelation) -> VigilResult<MemoryRelation> {
        let _span = graph_span!(relation.subject_id, "upsert_relation").entered();
        self.active_graph_owner(&relation.subject_id)?;
        self.graphs
            .upsert_relation_then(relation, |stored| self.storage.upsert_relation(stored))
    }

    /// A recall event: the memory was accessed, and its strength moves by
    /// `delta` (-1.0 to 1.0, result clamped to 0.0–1.0).
    pub fn record_recall(
        &self,
        subject_id: &str,
        memory_id: &str,
        delta: f64,
    ) -> VigilResult<MemoryEntity> {
        let _span = graph_span!(subject_id, "record_recall").entered();
        if !delta.is_finite() || !(-1.0..=1.0).contains(&delta) {
            return Err(ValidationError::AttributeOutOfRange {
                field: "recall_delta".to_string(),
                value: delta,
            }
            .into());
        }
        self.active_graph_owner(subject_id)?;
        self.graphs.record_recall_then(
            subject_id,
            memory_id,
            delta,
            self.clock.now(),
            |entity| self.storage.upsert_memory(entity),
        )
    }

    pub fn get_memory(&self, subject_id: &str, memory_id: &str) -> VigilResult<MemoryEntity> {
        self.graph_owner(subject_id)?;
        self.graphs.get_entity(subject_id, memory_id)
    }

    /// Every memory of a patient, oldest first.
    pub fn list_memories(&self, subject_id: &str) -> VigilResult<Vec<MemoryEntity>> {
        self.graph_owner(subject_id)?;
        self.graphs.entities(subject_id)
    }

    pub fn neighbors(&self, subject_id: &str, memory_id: &str) -> VigilResult<Vec<Neighbor>> {
        self.graph_owner(subject_id)?;
        self.graphs.neighbors(subject_id, memory_id)
    }

    pub fn neighbors_by_type(
        &self,
        subject_id: &str,
        memory_id: &str,
        relation_type: RelationType,
    ) -> VigilResult<Vec<Neighbor>> {
        self.graph_owner(subject_id)?;
        self.graphs
            .neighbors_by_type(subject_id, memory_id, relation_type)
    }

    /// Decay outlook from the memory's current attributes. Pure; nothing is scheduled.
    pub fn predict_decay(&self, subject_id: &str, memory_id: &str) -> VigilResult<DecayPrediction> {
        let memory = self.get_memory(subject_id, memory_id)?;
        Ok(self.decay.predict(&memory, self.clock.now()))
    }

    /// Predict decay and, when recommended, schedule (or coalesce into) an
    /// intervention anchored on the memory's strongest neighbors.
    pub fn evaluate_memory(&self, subject_id: &str, memory_id: &str) -> VigilResult<MemoryEvaluation> {
        self.active_graph_owner(subject_id)?;
        let memory = self.graphs.get_entity(subject_id, memory_id)?;
        self.evaluate(&memory)
    }

    /// [`evaluate_memory`](Self::evaluate_memory) for every memory of a patient.
    pub fn scan_memory_decay(&self, subject_id: &str) -> VigilResult<Vec<MemoryEvaluation>> {
        self.active_graph_owner(subject_id)?;
        self.graphs
            .entities(subject_id)?
            .iter()
            .map(|memory| self.evaluate(memory))
            .collect()
    }

    fn evaluate(&self, memory: &MemoryEntity) -> VigilResult<MemoryEvaluation> {
        let now = self.clock.now();
        let prediction = self.decay.predict(memory, now);
        let anchors = self
            .graphs
            .strongest_neighbors(&memory.subject_id, &memory.id, MAX_INTERVENTION_ANCHORS)?
            .into_iter()
            .map(|n| n.entity.id)
            .collect();

        let proposal = match self.planner.for_decay(memory, &prediction, anchors, now) {
            Some(candidate) => Some(self.propose(candidate, now)?),
            None => None,
        };
        Ok(MemoryEvaluation {
            prediction,
            coalesced: proposal.as_ref().is_some_and(|p| !p.is_created()),
            intervention: proposal.map(|p| p.intervention().clone()),
        })
    }
}
