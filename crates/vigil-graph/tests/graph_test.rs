use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{Duration, Utc};
use vigil_core::errors::GraphError;
use vigil_core::models::{MemoryEntity, MemoryRelation, MemoryType, RelationType};
use vigil_core::VigilError;
use vigil_graph::{MemoryGraphStore, NeighborDirection, SubjectGraph};

fn entity(subject: &str, memory_type: MemoryType, name: &str) -> MemoryEntity {
    MemoryEntity::new(subject, memory_type, name, Utc::now())
}

fn relation(
    subject: &str,
    source: &MemoryEntity,
    target: &MemoryEntity,
    relation_type: RelationType,
    weight: f64,
) -> MemoryRelation {
    MemoryRelation::new(subject, &source.id, &target.id, relation_type, weight, Utc::now())
}

#[test]
fn neighbors_cover_both_directions() {
    let store = MemoryGraphStore::new();
    let alice = store.upsert_entity(entity("p1", MemoryType::Person, "Alice")).unwrap();
    let home = store.upsert_entity(entity("p1", MemoryType::Place, "Home")).unwrap();
    let bob = store.upsert_entity(entity("p1", MemoryType::Person, "Bob")).unwrap();

    store
        .upsert_relation(relation("p1", &alice, &home, RelationType::LocatedAt, 0.9))
        .unwrap();
    store
        .upsert_relation(relation("p1", &bob, &alice, RelationType::Family, 0.6))
        .unwrap();

    let neighbors = store.neighbors("p1", &alice.id).unwrap();
    assert_eq!(neighbors.len(), 2);
    assert_eq!(neighbors[0].entity.id, home.id);
    assert_eq!(neighbors[0].direction, NeighborDirection::Outgoing);
    assert_eq!(neighbors[1].entity.id, bob.id);
    assert_eq!(neighbors[1].direction, NeighborDirection::Incoming);
}

#[test]
fn neighbors_by_relation_type() {
    let store = MemoryGraphStore::new();
    let alice = store.upsert_entity(entity("p1", MemoryType::Person, "Alice")).unwrap();
    let home = store.upsert_entity(entity("p1", MemoryType::Place, "Home")).unwrap();
    let bob = store.upsert_entity(entity("p1", MemoryType::Person, "Bob")).unwrap();
    store
        .upsert_relation(relation("p1", &alice, &home, RelationType::LocatedAt, 0.9))
        .unwrap();
    store
        .upsert_relation(relation("p1", &alice, &bob, RelationType::Family, 0.7))
        .unwrap();

    let family = store
        .neighbors_by_type("p1", &alice.id, RelationType::Family)
        .unwrap();
    assert_eq!(family.len(), 1);
    assert_eq!(family[0].entity.name, "Bob");

    let all_family = store.relations_of_type("p1", RelationType::Family).unwrap();
    assert_eq!(all_family.len(), 1);
    assert!(store
        .relations_of_type("p1", RelationType::Temporal)
        .unwrap()
        .is_empty());
}

#[test]
fn self_loop_is_rejected() {
    let store = MemoryGraphStore::new();
    let alice = store.upsert_entity(entity("p1", MemoryType::Person, "Alice")).unwrap();
    let err = store
        .upsert_relation(relation("p1", &alice, &alice, RelationType::Emotional, 0.5))
        .unwrap_err();
    assert!(matches!(
        err,
        VigilError::InvariantViolation(GraphError::SelfLoop { .. })
    ));
}

#[test]
fn missing_endpoint_is_rejected() {
    let store = MemoryGraphStore::new();
    let alice = store.upsert_entity(entity("p1", MemoryType::Person, "Alice")).unwrap();
    let ghost = entity("p1", MemoryType::Person, "Ghost");
    let err = store
        .upsert_relation(relation("p1", &alice, &ghost, RelationType::Friend, 0.5))
        .unwrap_err();
    assert!(matches!(
        err,
        VigilError::InvariantViolation(GraphError::EndpointMissing { .. })
    ));
}

#[test]
fn cross_subject_relation_is_rejected() {
    let store = MemoryGraphStore::new();
    let alice = store.upsert_entity(entity("p1", MemoryType::Person, "Alice")).unwrap();
    let carol = store.upsert_entity(entity("p2", MemoryType::Person, "Carol")).unwrap();
    let err = store
        .upsert_relation(relation("p1", &alice, &carol, RelationType::Friend, 0.5))
        .unwrap_err();
    assert!(matches!(
        err,
        VigilError::InvariantViolation(GraphError::ForeignEntity { .. })
    ));
    // Graph unchanged.
    assert!(store.neighbors("p1", &alice.id).unwrap().is_empty());
}

#[test]
fn entity_cannot_move_between_subjects() {
    let store = MemoryGraphStore::new();
    let alice = store.upsert_entity(entity("p1", MemoryType::Person, "Alice")).unwrap();
    let mut moved = alice.clone();
    moved.subject_id = "p2".into();
    assert!(matches!(
        store.upsert_entity(moved).unwrap_err(),
        VigilError::InvariantViolation(GraphError::ForeignEntity { .. })
    ));
}

#[test]
fn out_of_range_attributes_are_rejected() {
    let store = MemoryGraphStore::new();
    let mut bad = entity("p1", MemoryType::Skill, "Piano");
    bad.recall_strength = 1.5;
    assert!(matches!(
        store.upsert_entity(bad).unwrap_err(),
        VigilError::Validation(_)
    ));

    let a = store.upsert_entity(entity("p1", MemoryType::Skill, "Piano")).unwrap();
    let b = store.upsert_entity(entity("p1", MemoryType::Event, "Recital")).unwrap();
    assert!(matches!(
        store
            .upsert_relation(relation("p1", &a, &b, RelationType::Temporal, -0.1))
            .unwrap_err(),
        VigilError::Validation(_)
    ));
}

#[test]
fn repeated_relation_updates_weight_in_place() {
    let store = MemoryGraphStore::new();
    let a = store.upsert_entity(entity("p1", MemoryType::Person, "A")).unwrap();
    let b = store.upsert_entity(entity("p1", MemoryType::Person, "B")).unwrap();
    let first = store
        .upsert_relation(relation("p1", &a, &b, RelationType::Friend, 0.3))
        .unwrap();
    let second = store
        .upsert_relation(relation("p1", &a, &b, RelationType::Friend, 0.8))
        .unwrap();
    assert_eq!(first.id, second.id);

    let neighbors = store.neighbors("p1", &a.id).unwrap();
    assert_eq!(neighbors.len(), 1);
    assert_eq!(neighbors[0].weight, 0.8);
}

#[test]
fn upsert_entity_keeps_creation_time() {
    let store = MemoryGraphStore::new();
    let original = store.upsert_entity(entity("p1", MemoryType::Object, "Watch")).unwrap();
    let mut edited = original.clone();
    edited.created_at = original.created_at + Duration::days(10);
    edited.description = Some("Grandfather's watch".into());
    let stored = store.upsert_entity(edited).unwrap();
    assert_eq!(stored.created_at, original.created_at);
    assert_eq!(store.entities("p1").unwrap().len(), 1);
}

#[test]
fn recall_touches_and_clamps_strength() {
    let store = MemoryGraphStore::new();
    let mut e = entity("p1", MemoryType::Routine, "Morning walk");
    e.recall_strength = 0.95;
    let e = store.upsert_entity(e).unwrap();
    let later = Utc::now() + Duration::days(3);

    let recalled = store.record_recall("p1", &e.id, 0.1, later).unwrap();
    assert_eq!(recalled.recall_strength, 1.0);
    assert_eq!(recalled.access_count, 1);
    assert_eq!(recalled.last_accessed, later);

    let faded = store.record_recall("p1", &e.id, -2.0, later).unwrap();
    assert_eq!(faded.recall_strength, 0.0);
    assert_eq!(faded.access_count, 2);
}

#[test]
fn strongest_neighbors_are_distinct_and_limited() {
    let store = MemoryGraphStore::new();
    let hub = store.upsert_entity(entity("p1", MemoryType::Person, "Hub")).unwrap();
    let mut spokes = Vec::new();
    for (i, w) in [0.2, 0.9, 0.5, 0.7].iter().enumerate() {
        let s = store
            .upsert_entity(entity("p1", MemoryType::Event, &format!("E{i}")))
            .unwrap();
        store
            .upsert_relation(relation("p1", &hub, &s, RelationType::Temporal, *w))
            .unwrap();
        spokes.push(s);
    }
    // Second relation to the strongest spoke must not duplicate it.
    store
        .upsert_relation(relation("p1", &spokes[1], &hub, RelationType::Emotional, 0.4))
        .unwrap();

    let top = store.strongest_neighbors("p1", &hub.id, 3).unwrap();
    let weights: Vec<_> = top.iter().map(|n| n.weight).collect();
    assert_eq!(weights, vec![0.9, 0.7, 0.5]);
}

#[test]
fn snapshot_rebuilds_identical_graph() {
    let store = MemoryGraphStore::new();
    let a = store.upsert_entity(entity("p1", MemoryType::Person, "A")).unwrap();
    let b = store.upsert_entity(entity("p1", MemoryType::Place, "B")).unwrap();
    store
        .upsert_relation(relation("p1", &a, &b, RelationType::LocatedAt, 0.6))
        .unwrap();

    let snapshot = store.snapshot("p1").unwrap().unwrap();
    let json = serde_json::to_string(&snapshot).unwrap();
    let restored = SubjectGraph::from_snapshot(serde_json::from_str(&json).unwrap()).unwrap();
    assert_eq!(restored.entity_count(), 2);
    assert_eq!(restored.relation_count(), 1);
    assert_eq!(restored.snapshot(), snapshot);

    let other = MemoryGraphStore::new();
    other.load(snapshot).unwrap();
    assert_eq!(other.neighbors("p1", &a.id).unwrap().len(), 1);
}

#[test]
fn unknown_subject_or_entity_is_not_found() {
    let store = MemoryGraphStore::new();
    assert!(matches!(
        store.neighbors("nobody", "x").unwrap_err(),
        VigilError::NotFound { .. }
    ));
    store.open("p1");
    assert!(matches!(
        store.neighbors("p1", "x").unwrap_err(),
        VigilError::NotFound { .. }
    ));
    assert!(store.entities("nobody").unwrap().is_empty());
}

#[test]
fn different_subjects_update_concurrently() {
    let store = Arc::new(MemoryGraphStore::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let subject = format!("p{i}");
                let mut prev: Option<MemoryEntity> = None;
                for n in 0..50 {
                    let e = store
                        .upsert_entity(entity(&subject, MemoryType::Event, &format!("e{n}")))
                        .unwrap();
                    if let Some(p) = &prev {
                        store
                            .upsert_relation(relation(&subject, p, &e, RelationType::Temporal, 0.5))
                            .unwrap();
                    }
                    prev = Some(e);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(store.subject_count(), 8);
    for i in 0..8 {
        let snap = store.snapshot(&format!("p{i}")).unwrap().unwrap();
        assert_eq!(snap.entities.len(), 50);
        assert_eq!(snap.relations.len(), 49);
    }
}

#[test]
fn failed_commit_leaves_graph_unchanged() {
    let store = MemoryGraphStore::new();
    let alice = store.upsert_entity(entity("p1", MemoryType::Person, "Alice")).unwrap();

    let refused = store.upsert_entity_then(entity("p1", MemoryType::Place, "Home"), |_| {
        Err(VigilError::Concurrency("disk went away".to_string()))
    });
    assert!(refused.is_err());
    assert_eq!(store.entities("p1").unwrap().len(), 1);

    let before = store.get_entity("p1", &alice.id).unwrap();
    let refused = store.record_recall_then("p1", &alice.id, 0.3, Utc::now(), |_| {
        Err(VigilError::Concurrency("disk went away".to_string()))
    });
    assert!(refused.is_err());
    assert_eq!(store.get_entity("p1", &alice.id).unwrap(), before);

    let mut committed = None;
    let home = store
        .upsert_entity_then(entity("p1", MemoryType::Place, "Home"), |e| {
            committed = Some(e.id.clone());
            Ok(())
        })
        .unwrap();
    assert_eq!(committed.as_deref(), Some(home.id.as_str()));
    assert_eq!(store.entities("p1").unwrap().len(), 2);
}

#[test]
fn racing_subjects_cannot_share_an_entity() {
    for _ in 0..200 {
        let store = Arc::new(MemoryGraphStore::new());
        let shared = entity("a", MemoryType::Person, "Alice");
        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|subject| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                let mut claimed = shared.clone();
                claimed.subject_id = subject.into();
                thread::spawn(move || {
                    barrier.wait();
                    store.upsert_entity(claimed)
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(VigilError::InvariantViolation(GraphError::ForeignEntity { .. }))
        )));
        let owner = &winners[0].subject_id;
        let loser = if owner == "a" { "b" } else { "a" };
        assert!(store.get_entity(owner, &shared.id).is_ok());
        assert!(store.get_entity(loser, &shared.id).is_err());
    }
}

#[test]
fn failed_commit_releases_a_fresh_claim() {
    let store = MemoryGraphStore::new();
    let alice = entity("p1", MemoryType::Person, "Alice");

    let refused = store.upsert_entity_then(alice.clone(), |_| {
        Err(VigilError::Concurrency("disk went away".to_string()))
    });
    assert!(refused.is_err());

    let mut elsewhere = alice.clone();
    elsewhere.subject_id = "p2".into();
    let stored = store.upsert_entity(elsewhere).unwrap();
    assert_eq!(stored.subject_id, "p2");

    // An existing owner keeps its claim through a failed rewrite.
    let refused = store.upsert_entity_then(stored.clone(), |_| {
        Err(VigilError::Concurrency("disk went away".to_string()))
    });
    assert!(refused.is_err());
    assert!(matches!(
        store.upsert_entity(alice).unwrap_err(),
        VigilError::InvariantViolation(GraphError::ForeignEntity { .. })
    ));
}
