use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use test_fixtures::{manual_clock, uniform_answers, RecordingChannel};
use vigil_core::models::{Intervention, InterventionType, SubjectKind};
use vigil_core::traits::IVigilStorage;
use vigil_core::VigilConfig;
use vigil_engine::VigilEngine;
use vigil_storage::StorageEngine;

const INDICATOR_KEYS: [&str; 8] = [
    "feel_overwhelmed",
    "time_for_self",
    "emotional_strain",
    "physical_exhaustion",
    "sleep_quality",
    "social_isolation",
    "financial_stress",
    "relationship_strain",
];

fn arb_answers() -> impl Strategy<Value = BTreeMap<String, u8>> {
    prop::collection::vec(1u8..=5, INDICATOR_KEYS.len()).prop_map(|values| {
        INDICATOR_KEYS
            .iter()
            .zip(values)
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    })
}

fn active_by_type(interventions: &[Intervention]) -> HashMap<InterventionType, usize> {
    let mut counts = HashMap::new();
    for i in interventions.iter().filter(|i| i.is_active()) {
        *counts.entry(i.intervention_type).or_default() += 1;
    }
    counts
}

// ── Concurrent submissions never duplicate an active intervention ────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn concurrent_assessments_keep_one_active_per_type(
        batches in prop::collection::vec(prop::collection::vec(arb_answers(), 1..4), 4)
    ) {
        let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
        let engine = VigilEngine::new(
            VigilConfig::default(),
            storage.clone(),
            Arc::new(RecordingChannel::new()),
        )
        .unwrap()
        .with_clock(Arc::new(manual_clock()));
        let ana = engine.enroll_subject(SubjectKind::Caregiver, "Ana").unwrap();

        thread::scope(|scope| {
            for batch in &batches {
                let engine = &engine;
                let subject_id = ana.id.as_str();
                scope.spawn(move || {
                    for responses in batch {
                        engine.submit_assessment(subject_id, responses.clone()).unwrap();
                    }
                });
            }
        });

        let in_memory = engine.list_interventions(&ana.id, None).unwrap();
        let stored = storage.list_interventions(&ana.id, None).unwrap();
        for (kind, n) in active_by_type(&in_memory) {
            prop_assert!(n <= 1, "{n} active {kind} in memory");
        }
        for (kind, n) in active_by_type(&stored) {
            prop_assert!(n <= 1, "{n} active {kind} in storage");
        }
        prop_assert_eq!(in_memory.len(), stored.len());

        let submitted: usize = batches.iter().map(Vec::len).sum();
        prop_assert_eq!(engine.metrics().scoring.assessments_scored, submitted as u64);
    }

    #[test]
    fn uniform_stress_orders_composites(low in 1u8..=4) {
        let engine = VigilEngine::new(
            VigilConfig::default(),
            Arc::new(StorageEngine::open_in_memory().unwrap()),
            Arc::new(RecordingChannel::new()),
        )
        .unwrap()
        .with_clock(Arc::new(manual_clock()));
        let ana = engine.enroll_subject(SubjectKind::Caregiver, "Ana").unwrap();

        let calmer = engine.submit_assessment(&ana.id, uniform_answers(low)).unwrap();
        let harder = engine.submit_assessment(&ana.id, uniform_answers(low + 1)).unwrap();
        prop_assert!(calmer.score.composite < harder.score.composite);
        prop_assert!(calmer.score.tier <= harder.score.tier);
    }
}
