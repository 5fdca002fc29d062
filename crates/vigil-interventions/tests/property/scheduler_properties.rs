use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use chrono::{Duration, Utc};
use proptest::prelude::*;
use vigil_core::errors::DeliveryError;
use vigil_core::models::{
    Intervention, InterventionAction, InterventionTrigger, InterventionType,
};
use vigil_interventions::InterventionScheduler;

#[derive(Debug, Clone)]
enum Op {
    Trigger { subject: usize, kind: usize, offset_mins: i64 },
    Sweep { succeed: bool },
    Act { pick: usize, action: usize },
    Advance { mins: i64 },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..3, 0usize..6, 0i64..120).prop_map(|(subject, kind, offset_mins)| Op::Trigger { subject, kind, offset_mins }),
        2 => any::<bool>().prop_map(|succeed| Op::Sweep { succeed }),
        2 => (0usize..64, 0usize..3).prop_map(|(pick, action)| Op::Act { pick, action }),
        1 => (1i64..180).prop_map(|mins| Op::Advance { mins }),
    ]
}

fn trigger(subject: usize, kind: usize, at: chrono::DateTime<Utc>) -> Intervention {
    Intervention::new(
        format!("s{subject}"),
        InterventionType::ALL[kind],
        InterventionTrigger::Decay {
            memory_id: format!("m{kind}"),
            probability: 0.8,
        },
        "t",
        at,
        at,
    )
}

fn assert_one_active_per_type(scheduler: &InterventionScheduler, subjects: usize) {
    for s in 0..subjects {
        let mut active: HashMap<InterventionType, usize> = HashMap::new();
        for i in scheduler.list(&format!("s{s}"), None).unwrap() {
            if i.is_active() {
                *active.entry(i.intervention_type).or_default() += 1;
            }
        }
        for (t, n) in active {
            assert!(n <= 1, "subject s{s} has {n} active {t}");
        }
    }
}

// ── One active intervention per (subject, type) under any interleaving ───

proptest! {
    #[test]
    fn one_active_per_type(ops in prop::collection::vec(arb_op(), 1..80)) {
        let scheduler = InterventionScheduler::default();
        let mut now = Utc::now();
        let mut ids: Vec<String> = Vec::new();

        for op in ops {
            match op {
                Op::Trigger { subject, kind, offset_mins } => {
                    let p = scheduler
                        .propose(trigger(subject, kind, now + Duration::minutes(offset_mins)), now)
                        .unwrap();
                    ids.push(p.intervention().id.clone());
                }
                Op::Sweep { succeed } => {
                    for ticket in scheduler.claim_due(now).unwrap() {
                        let result = if succeed {
                            Ok(())
                        } else {
                            Err(DeliveryError::Unavailable { reason: "down".into() })
                        };
                        scheduler.settle(&ticket, result, now).unwrap();
                    }
                }
                Op::Act { pick, action } => {
                    if !ids.is_empty() {
                        let id = &ids[pick % ids.len()];
                        let action = [
                            InterventionAction::Complete,
                            InterventionAction::Skip,
                            InterventionAction::Cancel,
                        ][action];
                        // Rejections are expected; state must stay consistent either way.
                        let _ = scheduler.act(id, action, None, now);
                    }
                }
                Op::Advance { mins } => now += Duration::minutes(mins),
            }
            assert_one_active_per_type(&scheduler, 3);
        }
    }
}

// ── Sweep twice in a row: the second sweep transitions nothing ───────────

proptest! {
    #[test]
    fn sweep_is_idempotent(kinds in prop::collection::vec(0usize..6, 1..12)) {
        let scheduler = InterventionScheduler::default();
        let now = Utc::now();
        for kind in kinds {
            scheduler.propose(trigger(0, kind, now), now).unwrap();
        }
        for ticket in scheduler.claim_due(now).unwrap() {
            scheduler.settle(&ticket, Ok(()), now).unwrap();
        }
        let before = scheduler.list("s0", None).unwrap();
        prop_assert!(scheduler.claim_due(now).unwrap().is_empty());
        prop_assert_eq!(scheduler.list("s0", None).unwrap(), before);
    }
}

// ── Concurrent triggers from many threads ────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn concurrent_triggers_coalesce(seeds in prop::collection::vec((0usize..6, 0i64..600), 8..64)) {
        let scheduler = Arc::new(InterventionScheduler::default());
        let now = Utc::now();
        let chunks: Vec<Vec<(usize, i64)>> = seeds.chunks(4).map(|c| c.to_vec()).collect();
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                let scheduler = Arc::clone(&scheduler);
                thread::spawn(move || {
                    for (kind, offset) in chunk {
                        scheduler
                            .propose(trigger(0, kind, now + Duration::seconds(offset)), now)
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_one_active_per_type(&scheduler, 1);
        // Each type's surviving time is the earliest offered.
        for i in scheduler.list("s0", None).unwrap() {
            let kind = InterventionType::ALL
                .iter()
                .position(|t| *t == i.intervention_type)
                .unwrap();
            let earliest = seeds
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, o)| *o)
                .min()
                .unwrap();
            prop_assert_eq!(i.scheduled_for, now + Duration::seconds(earliest));
        }
    }
}
