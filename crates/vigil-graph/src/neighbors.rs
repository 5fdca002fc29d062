use serde::{Deserialize, Serialize};

use vigil_core::models::{MemoryEntity, RelationType};

/// Which way the connecting relation points, seen from the queried entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborDirection {
    Outgoing,
    Incoming,
}

/// An entity one hop away, with the relation that connects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub entity: MemoryEntity,
    pub relation_id: String,
    pub relation_type: RelationType,
    pub weight: f64,
    pub direction: NeighborDirection,
}
