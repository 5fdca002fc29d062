use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// The 6 kinds of memory in a patient's graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    Person,
    Place,
    Event,
    Skill,
    Routine,
    Object,
}

impl MemoryType {
    pub const ALL: [MemoryType; 6] = [
        Self::Person,
        Self::Place,
        Self::Event,
        Self::Skill,
        Self::Routine,
        Self::Object,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Place => "place",
            Self::Event => "event",
            Self::Skill => "skill",
            Self::Routine => "routine",
            Self::Object => "object",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in a patient's memory graph.
///
/// Strength, emotional weight, and importance are all normalized to 0.0–1.0.
/// After creation the entity changes only through recall/reinforcement events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntity {
    pub id: String,
    pub subject_id: String,
    pub memory_type: MemoryType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub recall_strength: f64,
    pub emotional_weight: f64,
    pub importance: f64,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MemoryEntity {
    pub fn new(
        subject_id: impl Into<String>,
        memory_type: MemoryType,
        name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: super::new_id(),
            subject_id: subject_id.into(),
            memory_type,
            name: name.into(),
            description: None,
            recall_strength: 1.0,
            emotional_weight: 0.5,
            importance: 0.5,
            last_accessed: now,
            access_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fractional days since the memory was last recalled. Never negative.
    pub fn days_since_access(&self, now: DateTime<Utc>) -> f64 {
        (now - self.last_accessed).num_seconds().max(0) as f64 / 86_400.0
    }

    /// Check every normalized attribute lies in 0.0–1.0.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("recall_strength", self.recall_strength),
            ("emotional_weight", self.emotional_weight),
            ("importance", self.importance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::AttributeOutOfRange {
                    field: field.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}
