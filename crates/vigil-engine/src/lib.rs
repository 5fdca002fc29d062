//! # vigil-engine
//!
//! The service boundary. [`VigilEngine`] owns every subsystem (scoring,
//! memory graphs, decay, intervention books, trends, storage) and exposes
//! the operations a presentation layer calls. [`EngineRuntime`] adds the
//! worker pool and the periodic sweep that dispatches due interventions.
//!
//! Scoring, decay, and trend summaries are pure. Every write for one subject
//! runs under that subject's lock and reaches storage before in-memory state
//! changes; the external delivery channel is only ever awaited outside it.

pub mod dispatch;
pub mod engine;
pub mod interventions;
pub mod memory;
pub mod runtime;
pub mod scoring;
pub mod subjects;
pub mod trends;

pub use dispatch::SweepReport;
pub use engine::{EngineOptions, VigilEngine};
pub use memory::MemoryEvaluation;
pub use runtime::EngineRuntime;
pub use scoring::ScoreOutcome;
