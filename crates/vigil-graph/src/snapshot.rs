use serde::{Deserialize, Serialize};

use vigil_core::models::{MemoryEntity, MemoryRelation};

/// Serializable copy of one subject's graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub subject_id: String,
    /// Ordered by creation time, then id.
    pub entities: Vec<MemoryEntity>,
    /// Ordered by creation time, then id.
    pub relations: Vec<MemoryRelation>,
}
