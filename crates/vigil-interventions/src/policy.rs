//! Fixed priority tables from triggering signal to intervention type.

use vigil_core::constants::ELEVATED_INDICATOR_SCORE;
use vigil_core::models::{InterventionType, MemoryEntity, MemoryType, ScoreResult};

/// Emotional weight at or above which an event memory gets emotional preservation.
pub const EMOTIONAL_EVENT_WEIGHT: f64 = 0.7;

/// Scanned in order; the first elevated indicator decides the type.
pub const ASSESSMENT_PRIORITY: [(&str, InterventionType); 8] = [
    ("relationship_strain", InterventionType::EmotionalPreservation),
    ("emotional_strain", InterventionType::EmotionalPreservation),
    ("social_isolation", InterventionType::ContextualAnchoring),
    ("feel_overwhelmed", InterventionType::RoutineReminder),
    ("physical_exhaustion", InterventionType::RoutineReminder),
    ("sleep_quality", InterventionType::RoutineReminder),
    ("time_for_self", InterventionType::RoutineReminder),
    ("financial_stress", InterventionType::RoutineReminder),
];

/// Type for a decay-triggered intervention on `memory`.
pub fn for_decay(memory: &MemoryEntity) -> InterventionType {
    match memory.memory_type {
        MemoryType::Person => InterventionType::SpacedRepetition,
        MemoryType::Place => InterventionType::NavigationAssist,
        MemoryType::Routine => InterventionType::RoutineReminder,
        MemoryType::Event if memory.emotional_weight >= EMOTIONAL_EVENT_WEIGHT => {
            InterventionType::EmotionalPreservation
        }
        MemoryType::Event => InterventionType::MultimediaReinforcement,
        MemoryType::Skill => InterventionType::SpacedRepetition,
        MemoryType::Object => InterventionType::ContextualAnchoring,
    }
}

/// Type for an assessment-triggered intervention, with the indicator that chose it.
pub fn for_score(score: &ScoreResult) -> (InterventionType, Option<&'static str>) {
    ASSESSMENT_PRIORITY
        .iter()
        .find(|(key, _)| {
            score
                .sub_scores
                .get(*key)
                .is_some_and(|s| *s >= ELEVATED_INDICATOR_SCORE)
        })
        .map(|(key, t)| (*t, Some(*key)))
        .unwrap_or((InterventionType::RoutineReminder, None))
}

pub fn decay_title(intervention_type: InterventionType, memory_name: &str) -> String {
    match intervention_type {
        InterventionType::SpacedRepetition => format!("Practice recalling {memory_name}"),
        InterventionType::NavigationAssist => format!("Revisit the way to {memory_name}"),
        InterventionType::RoutineReminder => format!("Walk through {memory_name}"),
        InterventionType::EmotionalPreservation => format!("Share stories about {memory_name}"),
        InterventionType::MultimediaReinforcement => format!("Look through photos of {memory_name}"),
        InterventionType::ContextualAnchoring => format!("Connect {memory_name} to familiar things"),
    }
}

pub fn assessment_title(intervention_type: InterventionType) -> String {
    match intervention_type {
        InterventionType::EmotionalPreservation => "Emotional support check-in",
        InterventionType::ContextualAnchoring => "Reconnect with your support network",
        InterventionType::RoutineReminder => "Plan a restorative daily routine",
        InterventionType::SpacedRepetition => "Review coping strategies",
        InterventionType::MultimediaReinforcement => "Guided relaxation session",
        InterventionType::NavigationAssist => "Find local caregiver services",
    }
    .to_string()
}
