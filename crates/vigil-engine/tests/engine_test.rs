use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Duration;
use test_fixtures::{
    answers, assessment_scenario, burnout_answers, manual_clock, t0, RecordingChannel,
};
use vigil_core::errors::{RecordKind, ValidationError};
use vigil_core::models::{
    InterventionStatus, InterventionType, RiskTier, ScoreSource, SubjectKind, TrendDirection,
    TrendReport, Urgency,
};
use vigil_core::{ManualClock, VigilError};
use vigil_engine::{EngineOptions, VigilEngine};

fn engine() -> (VigilEngine, Arc<ManualClock>) {
    let clock = Arc::new(manual_clock());
    let engine = VigilEngine::open(EngineOptions::default(), Arc::new(RecordingChannel::new()))
        .unwrap()
        .with_clock(clock.clone());
    (engine, clock)
}

fn features(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// ── Subjects ─────────────────────────────────────────────────────────────

#[test]
fn enroll_and_deactivate_subject() {
    let (engine, clock) = engine();
    let ana = engine.enroll_subject(SubjectKind::Caregiver, "Ana").unwrap();
    assert!(ana.active);
    assert_eq!(ana.enrolled_at, t0());

    clock.advance(Duration::days(3));
    let gone = engine.deactivate_subject(&ana.id).unwrap();
    assert!(!gone.active);
    assert_eq!(gone.deactivated_at, Some(t0() + Duration::days(3)));

    // Deactivating again changes nothing.
    clock.advance(Duration::days(1));
    let again = engine.deactivate_subject(&ana.id).unwrap();
    assert_eq!(again, gone);
    assert_eq!(engine.get_subject(&ana.id).unwrap(), gone);
}

#[test]
fn subjects_are_listed_in_enrollment_order() {
    let (engine, clock) = engine();
    let first = engine.enroll_subject(SubjectKind::Patient, "Rosa").unwrap();
    clock.advance(Duration::minutes(5));
    let second = engine.enroll_subject(SubjectKind::Caregiver, "Luis").unwrap();

    let ids: Vec<String> = engine.list_subjects().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn unknown_subject_is_not_found() {
    let (engine, _) = engine();
    let err = engine.submit_assessment("nobody", burnout_answers()).unwrap_err();
    assert!(matches!(
        err,
        VigilError::NotFound {
            kind: RecordKind::Subject,
            ..
        }
    ));
    assert!(engine.deactivate_subject("nobody").is_err());
    assert!(engine.get_trend("nobody", None).is_err());
    assert!(engine.list_interventions("nobody", None).is_err());
}

#[test]
fn deactivated_subject_rejects_assessments() {
    let (engine, _) = engine();
    let ana = engine.enroll_subject(SubjectKind::Caregiver, "Ana").unwrap();
    engine.deactivate_subject(&ana.id).unwrap();

    let err = engine.submit_assessment(&ana.id, burnout_answers()).unwrap_err();
    assert!(matches!(err, VigilError::SubjectInactive { .. }));
}

// ── Assessments ──────────────────────────────────────────────────────────

#[test]
fn reference_assessment_scores_high_and_schedules_emotional_preservation() {
    let (engine, _) = engine();
    let ana = engine.enroll_subject(SubjectKind::Caregiver, "Ana").unwrap();
    let scenario = assessment_scenario("reference_burnout");

    let outcome = engine
        .submit_assessment(&ana.id, scenario.responses.clone())
        .unwrap();
    assert!((outcome.score.composite - scenario.expected_composite).abs() < 1e-9);
    assert_eq!(outcome.score.tier, RiskTier::High);
    assert_eq!(outcome.score.urgency, Urgency::High);
    assert_eq!(outcome.score.tier.as_str(), scenario.expected_tier);
    assert_eq!(outcome.score.sub_scores.len(), 8);

    let intervention = outcome.intervention.expect("high tier schedules an intervention");
    assert!(!outcome.coalesced);
    assert_eq!(
        intervention.intervention_type,
        InterventionType::EmotionalPreservation
    );
    assert_eq!(intervention.status, InterventionStatus::Scheduled);
    let lead = engine.config().scheduler.assessment_lead_secs as i64;
    assert_eq!(intervention.scheduled_for, t0() + Duration::seconds(lead));

    // Everything the submission produced is in storage.
    let history = engine
        .score_history(&ana.id, t0() - Duration::days(1), t0() + Duration::days(1))
        .unwrap();
    assert_eq!(history, vec![outcome.score.clone()]);
    let ScoreSource::Assessment { assessment_id } = &outcome.score.source else {
        panic!("assessment score must point at its assessment");
    };
    let stored = engine.get_assessment(assessment_id).unwrap().unwrap();
    assert_eq!(stored.responses, scenario.responses);
    assert_eq!(
        engine.list_interventions(&ana.id, None).unwrap(),
        vec![intervention]
    );
}

#[test]
fn critical_assessment_is_due_immediately() {
    let (engine, _) = engine();
    let ana = engine.enroll_subject(SubjectKind::Caregiver, "Ana").unwrap();
    let scenario = assessment_scenario("crisis_burnout");

    let outcome = engine.submit_assessment(&ana.id, scenario.responses).unwrap();
    assert_eq!(outcome.score.tier, RiskTier::Critical);
    assert_eq!(outcome.score.urgency, Urgency::Urgent);
    assert_eq!(outcome.intervention.unwrap().scheduled_for, t0());
}

#[test]
fn low_assessment_schedules_nothing() {
    let (engine, _) = engine();
    let ana = engine.enroll_subject(SubjectKind::Caregiver, "Ana").unwrap();
    let scenario = assessment_scenario("steady_burnout");

    let outcome = engine.submit_assessment(&ana.id, scenario.responses).unwrap();
    assert_eq!(outcome.score.tier, RiskTier::Low);
    assert!(outcome.intervention.is_none());
    assert!(engine.list_interventions(&ana.id, None).unwrap().is_empty());
}

#[test]
fn repeated_high_assessments_coalesce_into_one_intervention() {
    let (engine, clock) = engine();
    let ana = engine.enroll_subject(SubjectKind::Caregiver, "Ana").unwrap();

    let first = engine.submit_assessment(&ana.id, burnout_answers()).unwrap();
    clock.advance(Duration::minutes(10));
    let second = engine.submit_assessment(&ana.id, burnout_answers()).unwrap();

    let a = first.intervention.unwrap();
    let b = second.intervention.unwrap();
    assert!(second.coalesced);
    assert_eq!(a.id, b.id);
    // The earlier of the two times wins.
    assert_eq!(b.scheduled_for, a.scheduled_for);
    assert_eq!(
        engine
            .list_interventions(&ana.id, Some(InterventionStatus::Scheduled))
            .unwrap()
            .len(),
        1
    );

    let metrics = engine.metrics();
    assert_eq!(metrics.scoring.assessments_scored, 2);
    assert_eq!(metrics.interventions.created, 1);
    assert_eq!(metrics.interventions.coalesced, 1);
}

#[test]
fn invalid_assessment_persists_nothing() {
    let (engine, _) = engine();
    let ana = engine.enroll_subject(SubjectKind::Caregiver, "Ana").unwrap();

    let err = engine
        .submit_assessment(&ana.id, answers(&[("feel_overwhelmed", 6)]))
        .unwrap_err();
    assert!(matches!(
        err,
        VigilError::Validation(ValidationError::ResponseOutOfRange { value: 6, .. })
    ));
    let err = engine
        .submit_assessment(&ana.id, answers(&[("mood_swings", 3)]))
        .unwrap_err();
    assert!(matches!(
        err,
        VigilError::Validation(ValidationError::UnknownIndicator { .. })
    ));
    let err = engine.submit_assessment(&ana.id, BTreeMap::new()).unwrap_err();
    assert!(matches!(
        err,
        VigilError::Validation(ValidationError::EmptyAssessment)
    ));

    let history = engine
        .score_history(&ana.id, t0() - Duration::days(1), t0() + Duration::days(1))
        .unwrap();
    assert!(history.is_empty());
    assert!(engine.list_interventions(&ana.id, None).unwrap().is_empty());
    assert!(engine.get_trend(&ana.id, None).unwrap().is_no_data());
    assert_eq!(engine.metrics().scoring.rejected, 3);
}

// ── Signals ──────────────────────────────────────────────────────────────

#[test]
fn signals_score_through_the_model() {
    let (engine, _) = engine();
    let rosa = engine.enroll_subject(SubjectKind::Patient, "Rosa").unwrap();

    let outcome = engine
        .submit_signals(&rosa.id, features(&[("gait_instability", 0.9), ("missed_meals", 0.7)]))
        .unwrap();
    assert!((outcome.score.composite - 80.0).abs() < 1e-9);
    assert_eq!(outcome.score.tier, RiskTier::Critical);
    assert_eq!(
        outcome.score.source,
        ScoreSource::Signals {
            signal_set_id: outcome.score.source.source_id().to_string(),
            model: "weighted_mean".to_string(),
        }
    );
    assert!(outcome.intervention.is_some());
    assert_eq!(engine.metrics().scoring.signal_sets_scored, 1);
}

#[test]
fn out_of_range_signal_is_rejected() {
    let (engine, _) = engine();
    let rosa = engine.enroll_subject(SubjectKind::Patient, "Rosa").unwrap();

    let err = engine
        .submit_signals(&rosa.id, features(&[("missed_meals", 1.5)]))
        .unwrap_err();
    assert!(matches!(
        err,
        VigilError::Validation(ValidationError::AttributeOutOfRange { .. })
    ));
    assert!(engine.get_trend(&rosa.id, None).unwrap().is_no_data());
}

// ── Trends ───────────────────────────────────────────────────────────────

#[test]
fn single_score_is_no_data_not_stable() {
    let (engine, _) = engine();
    let ana = engine.enroll_subject(SubjectKind::Caregiver, "Ana").unwrap();
    engine.submit_assessment(&ana.id, burnout_answers()).unwrap();

    let report = engine.get_trend(&ana.id, None).unwrap();
    assert!(matches!(report, TrendReport::NoData { count: 1, .. }));
    assert_eq!(report.direction(), None);
}

#[test]
fn rising_scores_trend_upward() {
    let (engine, clock) = engine();
    let rosa = engine.enroll_subject(SubjectKind::Patient, "Rosa").unwrap();
    for value in [0.2, 0.4, 0.6] {
        engine
            .submit_signals(&rosa.id, features(&[("agitation", value)]))
            .unwrap();
        clock.advance(Duration::days(1));
    }

    let TrendReport::Trend(summary) = engine.get_trend(&rosa.id, None).unwrap() else {
        panic!("three scores in the window are enough for a trend");
    };
    assert_eq!(summary.window_days, 30);
    assert_eq!(summary.count, 3);
    assert_eq!(summary.direction, TrendDirection::Increasing);
    assert!((summary.mean - 40.0).abs() < 1e-9);
    assert!((summary.latest - 60.0).abs() < 1e-9);
    assert!(summary.series.windows(2).all(|w| w[0].at < w[1].at));
}

#[test]
fn trend_window_excludes_old_scores() {
    let (engine, clock) = engine();
    let rosa = engine.enroll_subject(SubjectKind::Patient, "Rosa").unwrap();
    engine
        .submit_signals(&rosa.id, features(&[("agitation", 0.2)]))
        .unwrap();
    clock.advance(Duration::days(10));
    engine
        .submit_signals(&rosa.id, features(&[("agitation", 0.3)]))
        .unwrap();

    assert!(matches!(
        engine.get_trend(&rosa.id, Some(7)).unwrap(),
        TrendReport::NoData { count: 1, .. }
    ));
    assert!(!engine.get_trend(&rosa.id, Some(30)).unwrap().is_no_data());
    assert!(matches!(
        engine.get_trend(&rosa.id, Some(0)).unwrap_err(),
        VigilError::Validation(ValidationError::InvalidWindow { days: 0 })
    ));
}

#[test]
fn unbounded_window_reports_every_score() {
    let (engine, clock) = engine();
    let rosa = engine.enroll_subject(SubjectKind::Patient, "Rosa").unwrap();
    for value in [0.2, 0.4] {
        engine
            .submit_signals(&rosa.id, features(&[("agitation", value)]))
            .unwrap();
        clock.advance(Duration::days(1));
    }

    for window in [100_000_000, i64::MAX] {
        let TrendReport::Trend(summary) = engine.get_trend(&rosa.id, Some(window)).unwrap() else {
            panic!("both scores fall inside the window");
        };
        assert_eq!(summary.count, 2);
    }
}
