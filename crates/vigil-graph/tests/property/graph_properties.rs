use chrono::Utc;
use proptest::prelude::*;
use vigil_core::models::{MemoryEntity, MemoryRelation, MemoryType, RelationType};
use vigil_graph::MemoryGraphStore;

fn arb_relation_type() -> impl Strategy<Value = RelationType> {
    prop::sample::select(RelationType::ALL.to_vec())
}

// ── Graph invariants survive arbitrary edge attempts ─────────────────────

proptest! {
    #[test]
    fn no_self_loops_or_foreign_edges(
        edges in prop::collection::vec((0usize..12, 0usize..12, arb_relation_type(), 0.0f64..=1.0), 0..60),
    ) {
        let store = MemoryGraphStore::new();
        // Entities 0..6 belong to p1, 6..12 to p2.
        let entities: Vec<MemoryEntity> = (0..12)
            .map(|i| {
                let subject = if i < 6 { "p1" } else { "p2" };
                store
                    .upsert_entity(MemoryEntity::new(subject, MemoryType::Person, format!("m{i}"), Utc::now()))
                    .unwrap()
            })
            .collect();

        for (s, t, rel_type, w) in edges {
            let relation = MemoryRelation::new(
                "p1",
                &entities[s].id,
                &entities[t].id,
                rel_type,
                w,
                Utc::now(),
            );
            let accepted = store.upsert_relation(relation).is_ok();
            let valid = s != t && s < 6 && t < 6;
            prop_assert_eq!(accepted, valid);
        }

        let snap = store.snapshot("p1").unwrap().unwrap();
        for r in &snap.relations {
            prop_assert_ne!(&r.source_id, &r.target_id);
            prop_assert!(snap.entities.iter().any(|e| e.id == r.source_id));
            prop_assert!(snap.entities.iter().any(|e| e.id == r.target_id));
        }
        let p2 = store.snapshot("p2").unwrap().unwrap();
        prop_assert!(p2.relations.is_empty());
    }
}
