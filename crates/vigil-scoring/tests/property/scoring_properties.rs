use std::collections::BTreeMap;

use chrono::Utc;
use proptest::prelude::*;
use vigil_core::models::Assessment;
use vigil_scoring::indicators::BURNOUT_INDICATORS;
use vigil_scoring::{classify, ScoreAggregator};

fn arb_responses() -> impl Strategy<Value = BTreeMap<String, u8>> {
    proptest::collection::vec(1u8..=5, BURNOUT_INDICATORS.len()).prop_map(|values| {
        BURNOUT_INDICATORS
            .iter()
            .zip(values)
            .map(|(i, v)| (i.key.to_string(), v))
            .collect()
    })
}

// ── Composite bounded 0–100 ──────────────────────────────────────────────

proptest! {
    #[test]
    fn composite_bounded(responses in arb_responses()) {
        let assessment = Assessment::new("s", responses, Utc::now());
        let result = ScoreAggregator::default()
            .score_assessment(&assessment, Utc::now())
            .unwrap();
        prop_assert!((0.0..=100.0).contains(&result.composite));
        for sub in result.sub_scores.values() {
            prop_assert!((0.0..=100.0).contains(sub));
        }
        prop_assert_eq!(result.tier, classify(result.composite));
    }
}

// ── Tier monotone in composite ───────────────────────────────────────────

proptest! {
    #[test]
    fn tier_monotone(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(lo) <= classify(hi));
    }
}

// ── Raising one risk answer never lowers the tier ────────────────────────

proptest! {
    #[test]
    fn more_stress_never_lowers_tier(responses in arb_responses()) {
        let aggregator = ScoreAggregator::default();
        let base = Assessment::new("s", responses.clone(), Utc::now());
        let before = aggregator.score_assessment(&base, Utc::now()).unwrap();

        let mut worse = responses;
        if let Some(v) = worse.get_mut("feel_overwhelmed") {
            *v = (*v + 1).min(5);
        }
        let after = aggregator
            .score_assessment(&Assessment::new("s", worse, Utc::now()), Utc::now())
            .unwrap();
        prop_assert!(after.composite >= before.composite);
        prop_assert!(after.tier >= before.tier);
    }
}
