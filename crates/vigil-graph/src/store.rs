//! MemoryGraphStore: one independently locked graph per subject.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use vigil_core::errors::{GraphError, RecordKind, VigilError, VigilResult};
use vigil_core::models::{MemoryEntity, MemoryRelation, RelationType};

use crate::neighbors::Neighbor;
use crate::snapshot::GraphSnapshot;
use crate::subject_graph::SubjectGraph;

type SharedGraph = Arc<RwLock<SubjectGraph>>;

/// Writes to one subject's graph are serialized by that graph's lock;
/// different subjects never contend.
#[derive(Default)]
pub struct MemoryGraphStore {
    graphs: DashMap<String, SharedGraph>,
    /// entity id → owning subject id.
    owners: DashMap<String, String>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph for a subject if it has none.
    pub fn open(&self, subject_id: &str) {
        self.graph_or_create(subject_id);
    }

    pub fn has_graph(&self, subject_id: &str) -> bool {
        self.graphs.contains_key(subject_id)
    }

    pub fn subject_count(&self) -> usize {
        self.graphs.len()
    }

    pub fn upsert_entity(&self, entity: MemoryEntity) -> VigilResult<MemoryEntity> {
        self.upsert_entity_then(entity, |_| Ok(()))
    }

    /// Upsert, then hand the stored entity to `commit` while the subject's
    /// write lock is still held. The graph changes only if `commit` succeeds.
    pub fn upsert_entity_then(
        &self,
        entity: MemoryEntity,
        commit: impl FnOnce(&MemoryEntity) -> VigilResult<()>,
    ) -> VigilResult<MemoryEntity> {
        let (entity_id, subject_id) = (entity.id.clone(), entity.subject_id.clone());
        let shared = self.graph_or_create(&subject_id);
        let stored = Self::write_draft(&shared, |g| {
            let claimed = self.claim_owner(&entity_id, &subject_id)?;
            let result = g.upsert_entity(entity).and_then(|stored| {
                commit(&stored)?;
                Ok(stored)
            });
            if result.is_err() && claimed {
                self.owners
                    .remove_if(&entity_id, |_, owner| owner == &subject_id);
            }
            result
        })?;
        debug!(subject_id = %stored.subject_id, entity_id = %stored.id, "memory entity upserted");
        Ok(stored)
    }

    pub fn upsert_relation(&self, relation: MemoryRelation) -> VigilResult<MemoryRelation> {
        self.upsert_relation_then(relation, |_| Ok(()))
    }

    /// Relation counterpart of [`upsert_entity_then`](Self::upsert_entity_then).
    pub fn upsert_relation_then(
        &self,
        relation: MemoryRelation,
        commit: impl FnOnce(&MemoryRelation) -> VigilResult<()>,
    ) -> VigilResult<MemoryRelation> {
        self.check_owner(&relation.source_id, &relation.subject_id)?;
        self.check_owner(&relation.target_id, &relation.subject_id)?;
        let shared = self.graph(&relation.subject_id).ok_or_else(|| {
            GraphError::EndpointMissing {
                subject_id: relation.subject_id.clone(),
                entity_id: relation.source_id.clone(),
            }
        })?;
        let stored = Self::write_draft(&shared, |g| {
            let stored = g.upsert_relation(relation)?;
            commit(&stored)?;
            Ok(stored)
        })?;
        debug!(
            subject_id = %stored.subject_id,
            relation_id = %stored.id,
            relation_type = %stored.relation_type,
            "memory relation upserted"
        );
        Ok(stored)
    }

    pub fn get_entity(&self, subject_id: &str, entity_id: &str) -> VigilResult<MemoryEntity> {
        self.read(subject_id, |g| {
            g.get_entity(entity_id)
                .cloned()
                .ok_or_else(|| VigilError::not_found(RecordKind::Memory, entity_id))
        })
    }

    /// Every entity in the subject's graph, oldest first. Empty if there is no graph.
    pub fn entities(&self, subject_id: &str) -> VigilResult<Vec<MemoryEntity>> {
        let Some(shared) = self.graph(subject_id) else {
            return Ok(Vec::new());
        };
        let entities = shared.read()?.snapshot().entities;
        Ok(entities)
    }

    pub fn neighbors(&self, subject_id: &str, entity_id: &str) -> VigilResult<Vec<Neighbor>> {
        self.read(subject_id, |g| g.neighbors(entity_id))
    }

    pub fn neighbors_by_type(
        &self,
        subject_id: &str,
        entity_id: &str,
        relation_type: RelationType,
    ) -> VigilResult<Vec<Neighbor>> {
        self.read(subject_id, |g| g.neighbors_by_type(entity_id, relation_type))
    }

    pub fn strongest_neighbors(
        &self,
        subject_id: &str,
        entity_id: &str,
        limit: usize,
    ) -> VigilResult<Vec<Neighbor>> {
        self.read(subject_id, |g| g.strongest_neighbors(entity_id, limit))
    }

    pub fn relations_of_type(
        &self,
        subject_id: &str,
        relation_type: RelationType,
    ) -> VigilResult<Vec<MemoryRelation>> {
        let Some(shared) = self.graph(subject_id) else {
            return Ok(Vec::new());
        };
        let relations = shared.read()?.relations_of_type(relation_type);
        Ok(relations)
    }

    pub fn record_recall(
        &self,
        subject_id: &str,
        entity_id: &str,
        delta: f64,
        now: DateTime<Utc>,
    ) -> VigilResult<MemoryEntity> {
        self.record_recall_then(subject_id, entity_id, delta, now, |_| Ok(()))
    }

    /// Recall event with a commit hook, as in [`upsert_entity_then`](Self::upsert_entity_then).
    pub fn record_recall_then(
        &self,
        subject_id: &str,
        entity_id: &str,
        delta: f64,
        now: DateTime<Utc>,
        commit: impl FnOnce(&MemoryEntity) -> VigilResult<()>,
    ) -> VigilResult<MemoryEntity> {
        let shared = self
            .graph(subject_id)
            .ok_or_else(|| VigilError::not_found(RecordKind::Memory, entity_id))?;
        Self::write_draft(&shared, |g| {
            let entity = g.record_recall(entity_id, delta, now)?;
            commit(&entity)?;
            Ok(entity)
        })
    }

    pub fn snapshot(&self, subject_id: &str) -> VigilResult<Option<GraphSnapshot>> {
        let Some(shared) = self.graph(subject_id) else {
            return Ok(None);
        };
        let snapshot = shared.read()?.snapshot();
        Ok(Some(snapshot))
    }

    /// Replace a subject's graph with one rebuilt from `snapshot`.
    pub fn load(&self, snapshot: GraphSnapshot) -> VigilResult<()> {
        let graph = SubjectGraph::from_snapshot(snapshot)?;
        let subject_id = graph.subject_id().to_string();
        for entity in graph.entities() {
            self.owners.insert(entity.id.clone(), subject_id.clone());
        }
        self.graphs
            .insert(subject_id, Arc::new(RwLock::new(graph)));
        Ok(())
    }

    fn graph(&self, subject_id: &str) -> Option<SharedGraph> {
        // Clone the Arc so the shard guard is released before locking the graph.
        self.graphs.get(subject_id).map(|g| Arc::clone(g.value()))
    }

    fn graph_or_create(&self, subject_id: &str) -> SharedGraph {
        let entry = self
            .graphs
            .entry(subject_id.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(SubjectGraph::new(subject_id))));
        Arc::clone(entry.value())
    }

    // Mutate a copy under the write lock and install it only on success.
    fn write_draft<T>(
        shared: &SharedGraph,
        f: impl FnOnce(&mut SubjectGraph) -> VigilResult<T>,
    ) -> VigilResult<T> {
        let mut guard = shared.write()?;
        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        *guard = draft;
        Ok(out)
    }

    fn read<T>(
        &self,
        subject_id: &str,
        f: impl FnOnce(&SubjectGraph) -> VigilResult<T>,
    ) -> VigilResult<T> {
        let shared = self.graph(subject_id).ok_or_else(|| {
            VigilError::not_found(RecordKind::Subject, subject_id)
        })?;
        let guard = shared.read()?;
        f(&guard)
    }

    /// Record `subject_id` as the entity's owner unless another subject
    /// already owns it. Returns true if this call made the claim.
    fn claim_owner(&self, entity_id: &str, subject_id: &str) -> VigilResult<bool> {
        match self.owners.entry(entity_id.to_string()) {
            Entry::Occupied(owner) if owner.get() != subject_id => Err(GraphError::ForeignEntity {
                entity_id: entity_id.to_string(),
                owner: owner.get().clone(),
                subject_id: subject_id.to_string(),
            }
            .into()),
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(subject_id.to_string());
                Ok(true)
            }
        }
    }

    fn check_owner(&self, entity_id: &str, subject_id: &str) -> VigilResult<()> {
        match self.owners.get(entity_id) {
            Some(owner) if owner.value() != subject_id => Err(GraphError::ForeignEntity {
                entity_id: entity_id.to_string(),
                owner: owner.value().clone(),
                subject_id: subject_id.to_string(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}
