use proptest::prelude::*;
use vigil_core::models::DecayInput;
use vigil_core::traits::IDecayStrategy;
use vigil_decay::horizon::days_until;
use vigil_decay::LogisticBlend;

fn arb_input() -> impl Strategy<Value = DecayInput> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..2000.0).prop_map(|(s, e, i, d)| DecayInput {
        recall_strength: s,
        emotional_weight: e,
        importance: i,
        days_since_access: d,
    })
}

// ── Bounded 0.0–1.0 ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn bounded_zero_to_one(input in arb_input()) {
        let p = LogisticBlend::default().probability(&input);
        prop_assert!((0.0..=1.0).contains(&p));
    }
}

// ── Monotone increasing in days ──────────────────────────────────────────

proptest! {
    #[test]
    fn increasing_in_days(input in arb_input(), extra in 1.0f64..30.0) {
        let strategy = LogisticBlend::default();
        let before = strategy.probability(&input);
        let after = strategy.probability(&input.aged_by(extra));
        prop_assert!(after >= before);
    }

    #[test]
    fn strictly_increasing_before_saturation(
        input in arb_input().prop_filter("short of saturation", |i| i.days_since_access < 800.0),
        extra in 1.0f64..30.0,
    ) {
        let strategy = LogisticBlend::default();
        let before = strategy.probability(&input);
        let after = strategy.probability(&input.aged_by(extra));
        prop_assert!(after > before, "{after} <= {before} at {} days", input.days_since_access);
    }
}

#[test]
fn saturates_far_past_the_last_access() {
    let strategy = LogisticBlend::default();
    let input = DecayInput {
        recall_strength: 0.0,
        emotional_weight: 0.0,
        importance: 0.0,
        days_since_access: 1_500.0,
    };
    assert_eq!(strategy.probability(&input), 1.0);
    assert_eq!(strategy.probability(&input.aged_by(365.0)), 1.0);
}

// ── Never increases with strength ────────────────────────────────────────

proptest! {
    #[test]
    fn non_increasing_in_strength(input in arb_input(), bump in 0.0f64..=1.0) {
        let strategy = LogisticBlend::default();
        let stronger = DecayInput {
            recall_strength: (input.recall_strength + bump).min(1.0),
            ..input
        };
        prop_assert!(strategy.probability(&stronger) <= strategy.probability(&input));
    }
}

// ── Critical horizon is the first crossing ───────────────────────────────

proptest! {
    #[test]
    fn horizon_is_first_crossing(input in arb_input(), target in 0.5f64..0.99) {
        let strategy = LogisticBlend::default();
        if let Some(d) = days_until(&strategy, &input, target, 365).days() {
            prop_assert!(strategy.probability(&input.aged_by(f64::from(d))) >= target);
            if d > 0 {
                prop_assert!(strategy.probability(&input.aged_by(f64::from(d - 1))) < target);
            }
        } else {
            prop_assert!(strategy.probability(&input.aged_by(365.0)) < target);
        }
    }
}
