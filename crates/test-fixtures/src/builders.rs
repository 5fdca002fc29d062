//! Record builders with fixed, readable defaults.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use vigil_core::models::{MemoryEntity, MemoryType, Subject, SubjectKind};
use vigil_core::ManualClock;

use crate::MemoryScenario;

/// Fixed start time for deterministic tests: 2026-03-02 09:00 UTC.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("fixed fixture time is valid"))
}

pub fn manual_clock() -> ManualClock {
    ManualClock::new(t0())
}

pub fn patient(display_name: &str) -> Subject {
    Subject::enroll(SubjectKind::Patient, display_name, t0())
}

pub fn caregiver(display_name: &str) -> Subject {
    Subject::enroll(SubjectKind::Caregiver, display_name, t0())
}

/// The eight burnout answers from the reference scenario.
pub fn burnout_answers() -> BTreeMap<String, u8> {
    crate::assessment_scenario("reference_burnout").responses
}

/// Build an answer map from literal pairs.
pub fn answers(pairs: &[(&str, u8)]) -> BTreeMap<String, u8> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Every burnout indicator answered so that each normalizes to the same value:
/// risk indicators get `stress`, protective ones the mirrored answer.
pub fn uniform_answers(stress: u8) -> BTreeMap<String, u8> {
    let mirrored = 6 - stress;
    answers(&[
        ("feel_overwhelmed", stress),
        ("time_for_self", mirrored),
        ("emotional_strain", stress),
        ("physical_exhaustion", stress),
        ("sleep_quality", mirrored),
        ("social_isolation", stress),
        ("financial_stress", stress),
        ("relationship_strain", stress),
    ])
}

/// A person memory last recalled `days_ago` days before `now`.
pub fn person_memory(
    subject_id: &str,
    name: &str,
    strength: f64,
    emotional: f64,
    importance: f64,
    days_ago: i64,
    now: DateTime<Utc>,
) -> MemoryEntity {
    memory(
        subject_id,
        MemoryType::Person,
        name,
        strength,
        emotional,
        importance,
        days_ago,
        now,
    )
}

#[allow(clippy::too_many_arguments)]
pub fn memory(
    subject_id: &str,
    memory_type: MemoryType,
    name: &str,
    strength: f64,
    emotional: f64,
    importance: f64,
    days_ago: i64,
    now: DateTime<Utc>,
) -> MemoryEntity {
    let last_accessed = now - Duration::days(days_ago);
    let mut entity = MemoryEntity::new(subject_id, memory_type, name, last_accessed);
    entity.recall_strength = strength;
    entity.emotional_weight = emotional;
    entity.importance = importance;
    entity
}

/// The memory a scenario describes, owned by `subject_id`.
pub fn scenario_memory(
    scenario: &MemoryScenario,
    subject_id: &str,
    now: DateTime<Utc>,
) -> MemoryEntity {
    memory(
        subject_id,
        scenario.memory_type,
        &scenario.name,
        scenario.recall_strength,
        scenario.emotional_weight,
        scenario.importance,
        scenario.days_since_access,
        now,
    )
}
