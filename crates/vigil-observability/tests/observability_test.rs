//! Metrics accounting, span names, and subscriber setup.

use std::time::Duration;

use vigil_core::config::ObservabilityConfig;
use vigil_core::models::RiskTier;
use vigil_observability::metrics::MetricsCollector;
use vigil_observability::tracing_setup::{self, events, spans};

// ── Scoring metrics ───────────────────────────────────────────────────────

#[test]
fn scoring_metrics_count_by_source_and_tier() {
    let mut metrics = MetricsCollector::new();
    metrics.scoring.record_assessment(RiskTier::High);
    metrics.scoring.record_assessment(RiskTier::High);
    metrics.scoring.record_signals(RiskTier::Critical);
    metrics.scoring.record_rejection();

    assert_eq!(metrics.scoring.total_scored(), 3);
    assert_eq!(metrics.scoring.tier_distribution["high"], 2);
    assert_eq!(metrics.scoring.tier_distribution["critical"], 1);
    assert_eq!(metrics.scoring.rejected, 1);
}

// ── Intervention metrics ──────────────────────────────────────────────────

#[test]
fn coalesce_rate_is_share_of_proposals() {
    let mut metrics = MetricsCollector::new();
    assert_eq!(metrics.interventions.coalesce_rate(), 0.0);

    metrics.interventions.record_proposal(true);
    metrics.interventions.record_proposal(false);
    metrics.interventions.record_proposal(false);
    metrics.interventions.record_proposal(true);

    assert_eq!(metrics.interventions.created, 2);
    assert_eq!(metrics.interventions.coalesced, 2);
    assert!((metrics.interventions.coalesce_rate() - 0.5).abs() < 1e-12);
}

// ── Sweep metrics ─────────────────────────────────────────────────────────

#[test]
fn dispatch_latency_average_is_bounded_to_recent_samples() {
    let mut metrics = MetricsCollector::new();
    for _ in 0..1_500 {
        metrics.sweeps.record_dispatch(Duration::from_millis(10));
    }
    metrics.sweeps.record_dispatch(Duration::from_millis(1_010));
    // 999 samples of 10ms plus one of 1010ms.
    assert!((metrics.sweeps.avg_dispatch_ms() - 11.0).abs() < 1e-9);
}

#[test]
fn reset_clears_everything() {
    let mut metrics = MetricsCollector::new();
    metrics.sweeps.record_sweep(4);
    metrics.interventions.delivered = 3;
    metrics.reset();

    assert_eq!(metrics.sweeps.sweeps_run, 0);
    assert_eq!(metrics.interventions.delivered, 0);
}

#[test]
fn json_snapshot_exposes_counters() {
    let mut metrics = MetricsCollector::new();
    metrics.sweeps.record_sweep(2);
    metrics.interventions.failed = 1;

    let json = metrics.to_json();
    assert_eq!(json["sweeps"]["sweeps_run"], 1);
    assert_eq!(json["sweeps"]["claimed"], 2);
    assert_eq!(json["interventions"]["failed"], 1);
}

// ── Tracing ───────────────────────────────────────────────────────────────

#[test]
fn span_names_are_namespaced() {
    for name in [
        spans::names::SCORING,
        spans::names::SWEEP,
        spans::names::DISPATCH,
        spans::names::GRAPH,
    ] {
        assert!(name.starts_with("vigil."));
    }
}

#[test]
fn subscriber_installs_once_and_events_do_not_panic() {
    let config = ObservabilityConfig {
        log_level: "debug".to_string(),
        json: true,
    };
    let first = tracing_setup::init_from_config(&config);
    let second = tracing_setup::init_tracing_with_filter("info");
    assert!(!(first && second), "a second global subscriber must be refused");

    let span = vigil_observability::sweep_span!(1u64);
    let _entered = span.enter();
    events::assessment_scored("s1", "score-1", 65.6, "high");
    events::intervention_scheduled("s1", "i1", "routine_reminder", "2026-03-01T10:00:00Z");
    events::intervention_coalesced("s1", "i1", "2026-03-01T09:00:00Z");
    events::intervention_delivered("s1", "i1", 1);
    events::delivery_retry_scheduled("i1", 1, "2026-03-01T09:01:00Z", "channel unavailable");
    events::intervention_failed("i1", "retries exhausted");
    events::sweep_completed(1, 1, 0, 0);
    events::storage_degraded("upsert_interventions", "disk full");
}
