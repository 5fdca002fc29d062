use vigil_core::errors::*;
use vigil_core::models::InterventionStatus;

#[test]
fn invalid_transition_echoes_current_state() {
    let err = VigilError::InvalidTransition {
        intervention_id: "iv-1".into(),
        current: InterventionStatus::Completed,
        attempted: "skip".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("iv-1"));
    assert!(msg.contains("completed"));
    assert!(msg.contains("skip"));
}

#[test]
fn not_found_carries_kind_and_id() {
    let err = VigilError::not_found(RecordKind::Subject, "abc-123");
    assert_eq!(err.to_string(), "subject not found: abc-123");
}

#[test]
fn validation_error_converts_to_vigil_error() {
    let err: VigilError = ValidationError::ResponseOutOfRange {
        indicator: "sleep_quality".into(),
        value: 9,
    }
    .into();
    assert!(matches!(err, VigilError::Validation(_)));
    assert!(err.to_string().contains("sleep_quality"));
}

#[test]
fn graph_error_converts_to_invariant_violation() {
    let err: VigilError = GraphError::SelfLoop {
        entity_id: "m-1".into(),
    }
    .into();
    assert!(matches!(err, VigilError::InvariantViolation(_)));
}

#[test]
fn storage_error_converts_to_vigil_error() {
    let err: VigilError = StorageError::SqliteError {
        message: "disk full".into(),
    }
    .into();
    assert!(matches!(err, VigilError::Storage(_)));
}

#[test]
fn delivery_error_converts_to_delivery_failure() {
    let err: VigilError = DeliveryError::TimedOut { timeout_ms: 5000 }.into();
    assert!(matches!(err, VigilError::DeliveryFailure(_)));
    assert!(err.to_string().contains("5000"));
}

#[test]
fn dispatch_in_progress_names_intervention() {
    let err = VigilError::DispatchInProgress {
        intervention_id: "iv-9".into(),
    };
    assert!(err.to_string().contains("iv-9"));
}
