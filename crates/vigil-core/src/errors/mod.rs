mod delivery_error;
mod graph_error;
mod storage_error;
mod validation_error;

pub use delivery_error::DeliveryError;
pub use graph_error::GraphError;
pub use storage_error::StorageError;
pub use validation_error::ValidationError;

use crate::models::InterventionStatus;

/// Result alias used across every Vigil crate.
pub type VigilResult<T> = Result<T, VigilError>;

/// Kinds of records that can be looked up by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Subject,
    Memory,
    Relation,
    Intervention,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Subject => "subject",
            Self::Memory => "memory",
            Self::Relation => "relation",
            Self::Intervention => "intervention",
        };
        f.write_str(name)
    }
}

/// Top-level error for the engine.
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    /// Malformed or out-of-range input. Nothing was persisted.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A graph or state rule would be broken. State is unchanged.
    #[error("invariant violation: {0}")]
    InvariantViolation(#[from] GraphError),

    /// Illegal lifecycle move. Carries the state the intervention is actually in.
    #[error("invalid transition for intervention {intervention_id}: cannot {attempted} from {current}")]
    InvalidTransition {
        intervention_id: String,
        current: InterventionStatus,
        attempted: String,
    },

    /// Cancellation arrived after the sweep claimed the intervention for dispatch.
    #[error("intervention {intervention_id} is already being dispatched")]
    DispatchInProgress { intervention_id: String },

    #[error("delivery failure: {0}")]
    DeliveryFailure(#[from] DeliveryError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("subject {id} is deactivated")]
    SubjectInactive { id: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("concurrency error: {0}")]
    Concurrency(String),
}

impl VigilError {
    pub fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for VigilError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Concurrency(err.to_string())
    }
}
