//! # vigil-interventions
//!
//! Decides which intervention a risk or decay signal calls for, keeps each
//! subject's interventions in a book guarded by that subject's lock, and
//! drives the lifecycle:
//!
//! ```text
//! scheduled ─┬─> delivered ─┬─> completed
//!            │              ├─> skipped
//!            │              └─> failed   (no confirmation in time)
//!            ├─> skipped                  (skip / cancel)
//!            └─> failed                   (retries exhausted)
//! ```
//!
//! Dispatch is split in three so the external channel is never called under
//! a subject lock: `claim_due` marks interventions in flight, the caller
//! dispatches, `settle` records the result.

pub mod backoff;
pub mod book;
pub mod planner;
pub mod policy;
pub mod scheduler;

pub use backoff::Backoff;
pub use book::{Proposal, Settlement, SubjectBook};
pub use planner::InterventionPlanner;
pub use scheduler::{DispatchTicket, InterventionScheduler};
