//! One subject's memory graph: petgraph arena plus id indexes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use vigil_core::errors::{GraphError, RecordKind, VigilError, VigilResult};
use vigil_core::models::{MemoryEntity, MemoryRelation, RelationType};

use crate::neighbors::{Neighbor, NeighborDirection};
use crate::snapshot::GraphSnapshot;

/// Nodes carry the entity id, edges carry the relation id. The records
/// themselves live in the side tables.
pub type MemoryStableGraph = StableGraph<String, String, Directed>;

#[derive(Clone)]
pub struct SubjectGraph {
    subject_id: String,
    graph: MemoryStableGraph,
    node_index: HashMap<String, NodeIndex>,
    edge_index: HashMap<String, EdgeIndex>,
    entities: HashMap<String, MemoryEntity>,
    relations: HashMap<String, MemoryRelation>,
}

impl SubjectGraph {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            graph: StableGraph::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
            entities: HashMap::new(),
            relations: HashMap::new(),
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Insert a new entity or replace an existing one, keeping its creation time.
    pub fn upsert_entity(&mut self, mut entity: MemoryEntity) -> VigilResult<MemoryEntity> {
        entity.validate()?;
        if entity.subject_id != self.subject_id {
            return Err(GraphError::ForeignEntity {
                entity_id: entity.id.clone(),
                owner: entity.subject_id.clone(),
                subject_id: self.subject_id.clone(),
            }
            .into());
        }

        if let Some(existing) = self.entities.get(&entity.id) {
            entity.created_at = existing.created_at;
        } else {
            let idx = self.graph.add_node(entity.id.clone());
            self.node_index.insert(entity.id.clone(), idx);
        }
        self.entities.insert(entity.id.clone(), entity.clone());
        Ok(entity)
    }

    /// Insert or update a relation.
    ///
    /// A relation with a known id is replaced in place. Otherwise an existing
    /// relation with the same source, target, and type absorbs the new weight.
    /// All checks run before anything is modified.
    pub fn upsert_relation(&mut self, mut relation: MemoryRelation) -> VigilResult<MemoryRelation> {
        relation.validate()?;
        if relation.source_id == relation.target_id {
            return Err(GraphError::SelfLoop {
                entity_id: relation.source_id.clone(),
            }
            .into());
        }
        let source = self.endpoint(&relation.source_id)?;
        let target = self.endpoint(&relation.target_id)?;

        let replaced = if self.relations.contains_key(&relation.id) {
            Some(relation.id.clone())
        } else {
            self.relations
                .values()
                .find(|r| {
                    r.source_id == relation.source_id
                        && r.target_id == relation.target_id
                        && r.relation_type == relation.relation_type
                })
                .map(|r| r.id.clone())
        };
        if let Some(old_id) = replaced {
            if let Some(old) = self.relations.remove(&old_id) {
                relation.id = old.id;
                relation.created_at = old.created_at;
            }
            if let Some(edge) = self.edge_index.remove(&old_id) {
                self.graph.remove_edge(edge);
            }
        }

        let edge = self.graph.add_edge(source, target, relation.id.clone());
        self.edge_index.insert(relation.id.clone(), edge);
        self.relations.insert(relation.id.clone(), relation.clone());
        Ok(relation)
    }

    pub fn get_entity(&self, entity_id: &str) -> Option<&MemoryEntity> {
        self.entities.get(entity_id)
    }

    pub fn get_relation(&self, relation_id: &str) -> Option<&MemoryRelation> {
        self.relations.get(relation_id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &MemoryEntity> {
        self.entities.values()
    }

    pub fn relations(&self) -> impl Iterator<Item = &MemoryRelation> {
        self.relations.values()
    }

    pub fn entity_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn relation_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Everything one hop away in either direction, strongest relation first.
    pub fn neighbors(&self, entity_id: &str) -> VigilResult<Vec<Neighbor>> {
        let idx = self.node(entity_id)?;
        let mut out = Vec::new();
        for (direction, petgraph_dir) in [
            (NeighborDirection::Outgoing, Direction::Outgoing),
            (NeighborDirection::Incoming, Direction::Incoming),
        ] {
            for edge in self.graph.edges_directed(idx, petgraph_dir) {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                let relation = self.relations.get(edge.weight());
                let entity = self
                    .graph
                    .node_weight(other)
                    .and_then(|id| self.entities.get(id));
                if let (Some(relation), Some(entity)) = (relation, entity) {
                    out.push(Neighbor {
                        entity: entity.clone(),
                        relation_id: relation.id.clone(),
                        relation_type: relation.relation_type,
                        weight: relation.weight,
                        direction,
                    });
                }
            }
        }
        out.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| a.entity.id.cmp(&b.entity.id))
        });
        Ok(out)
    }

    pub fn neighbors_by_type(
        &self,
        entity_id: &str,
        relation_type: RelationType,
    ) -> VigilResult<Vec<Neighbor>> {
        let mut all = self.neighbors(entity_id)?;
        all.retain(|n| n.relation_type == relation_type);
        Ok(all)
    }

    /// Up to `limit` distinct neighbor entities, by strongest connecting relation.
    pub fn strongest_neighbors(&self, entity_id: &str, limit: usize) -> VigilResult<Vec<Neighbor>> {
        let mut seen = std::collections::HashSet::new();
        Ok(self
            .neighbors(entity_id)?
            .into_iter()
            .filter(|n| seen.insert(n.entity.id.clone()))
            .take(limit)
            .collect())
    }

    /// All relations of one type in this graph, strongest first.
    pub fn relations_of_type(&self, relation_type: RelationType) -> Vec<MemoryRelation> {
        let mut out: Vec<_> = self
            .relations
            .values()
            .filter(|r| r.relation_type == relation_type)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.id.cmp(&b.id)));
        out
    }

    /// A recall event: touch the entity and move its strength by `delta`.
    pub fn record_recall(
        &mut self,
        entity_id: &str,
        delta: f64,
        now: DateTime<Utc>,
    ) -> VigilResult<MemoryEntity> {
        let entity = self
            .entities
            .get_mut(entity_id)
            .ok_or_else(|| VigilError::not_found(RecordKind::Memory, entity_id))?;
        entity.last_accessed = now;
        entity.access_count += 1;
        entity.recall_strength = (entity.recall_strength + delta).clamp(0.0, 1.0);
        entity.updated_at = now;
        Ok(entity.clone())
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        let mut entities: Vec<_> = self.entities.values().cloned().collect();
        entities.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        let mut relations: Vec<_> = self.relations.values().cloned().collect();
        relations.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        GraphSnapshot {
            subject_id: self.subject_id.clone(),
            entities,
            relations,
        }
    }

    /// Rebuild from a snapshot, re-checking every invariant.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> VigilResult<Self> {
        let mut graph = Self::new(snapshot.subject_id);
        for entity in snapshot.entities {
            graph.upsert_entity(entity)?;
        }
        for relation in snapshot.relations {
            graph.upsert_relation(relation)?;
        }
        Ok(graph)
    }

    fn node(&self, entity_id: &str) -> VigilResult<NodeIndex> {
        self.node_index
            .get(entity_id)
            .copied()
            .ok_or_else(|| VigilError::not_found(RecordKind::Memory, entity_id))
    }

    fn endpoint(&self, entity_id: &str) -> VigilResult<NodeIndex> {
        self.node_index.get(entity_id).copied().ok_or_else(|| {
            GraphError::EndpointMissing {
                subject_id: self.subject_id.clone(),
                entity_id: entity_id.to_string(),
            }
            .into()
        })
    }
}
