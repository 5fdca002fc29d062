//! Span definitions per operation: scoring, sweep, dispatch, graph.

/// Create a scoring span.
#[macro_export]
macro_rules! scoring_span {
    ($subject_id:expr, $source:expr) => {
        tracing::info_span!("vigil.scoring", subject_id = %$subject_id, source = %$source)
    };
}

/// Create a sweep span.
#[macro_export]
macro_rules! sweep_span {
    ($sweep:expr) => {
        tracing::info_span!("vigil.sweep", sweep = $sweep)
    };
}

/// Create a dispatch span for one intervention.
#[macro_export]
macro_rules! dispatch_span {
    ($intervention_id:expr, $attempt:expr) => {
        tracing::info_span!(
            "vigil.dispatch",
            intervention_id = %$intervention_id,
            attempt = $attempt
        )
    };
}

/// Create a memory graph mutation span.
#[macro_export]
macro_rules! graph_span {
    ($subject_id:expr, $op:expr) => {
        tracing::debug_span!("vigil.graph", subject_id = %$subject_id, op = %$op)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const SCORING: &str = "vigil.scoring";
    pub const SWEEP: &str = "vigil.sweep";
    pub const DISPATCH: &str = "vigil.dispatch";
    pub const GRAPH: &str = "vigil.graph";
}
