//! Structured log events for the engine's state changes.
//!
//! Each function emits one `tracing` event with an `event` field.

/// An assessment or signal set was scored and committed.
pub fn assessment_scored(subject_id: &str, score_id: &str, composite: f64, tier: &str) {
    tracing::info!(
        event = "assessment_scored",
        subject_id = %subject_id,
        score_id = %score_id,
        composite = composite,
        tier = %tier,
        "assessment scored"
    );
}

pub fn intervention_scheduled(
    subject_id: &str,
    intervention_id: &str,
    intervention_type: &str,
    scheduled_for: &str,
) {
    tracing::info!(
        event = "intervention_scheduled",
        subject_id = %subject_id,
        intervention_id = %intervention_id,
        intervention_type = %intervention_type,
        scheduled_for = %scheduled_for,
        "intervention scheduled"
    );
}

/// A new recommendation folded into an existing active intervention.
pub fn intervention_coalesced(subject_id: &str, intervention_id: &str, scheduled_for: &str) {
    tracing::debug!(
        event = "intervention_coalesced",
        subject_id = %subject_id,
        intervention_id = %intervention_id,
        scheduled_for = %scheduled_for,
        "intervention coalesced"
    );
}

pub fn intervention_delivered(subject_id: &str, intervention_id: &str, attempts: u32) {
    tracing::info!(
        event = "intervention_delivered",
        subject_id = %subject_id,
        intervention_id = %intervention_id,
        attempts = attempts,
        "intervention delivered"
    );
}

pub fn delivery_retry_scheduled(intervention_id: &str, retry: u32, retry_at: &str, error: &str) {
    tracing::warn!(
        event = "delivery_retry_scheduled",
        intervention_id = %intervention_id,
        retry = retry,
        retry_at = %retry_at,
        error = %error,
        "delivery failed, retry scheduled"
    );
}

pub fn intervention_failed(intervention_id: &str, reason: &str) {
    tracing::warn!(
        event = "intervention_failed",
        intervention_id = %intervention_id,
        reason = %reason,
        "intervention failed"
    );
}

pub fn sweep_completed(claimed: usize, delivered: usize, retried: usize, failed: usize) {
    tracing::info!(
        event = "sweep_completed",
        claimed = claimed,
        delivered = delivered,
        retried = retried,
        failed = failed,
        "sweep completed"
    );
}

/// Persisting an in-memory change failed; memory and disk may disagree until
/// the next successful write of the same record.
pub fn storage_degraded(operation: &str, error: &str) {
    tracing::error!(
        event = "storage_degraded",
        operation = %operation,
        error = %error,
        "storage write failed"
    );
}
