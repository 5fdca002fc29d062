//! # vigil-graph
//!
//! Memory graphs for patients. Each subject owns an independent arena graph
//! (`petgraph::StableGraph`) whose nodes are memory ids; relations reference
//! entities by id only, so a graph can be snapshotted, dropped, or rebuilt
//! per subject without touching any other.

pub mod neighbors;
pub mod snapshot;
pub mod store;
pub mod subject_graph;

pub use neighbors::{Neighbor, NeighborDirection};
pub use snapshot::GraphSnapshot;
pub use store::MemoryGraphStore;
pub use subject_graph::SubjectGraph;
