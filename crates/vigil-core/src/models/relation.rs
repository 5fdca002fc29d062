use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// The 6 relation types between memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Family,
    Friend,
    AssociatedWith,
    LocatedAt,
    /// Happened around the same time.
    Temporal,
    /// Emotionally linked.
    Emotional,
}

impl RelationType {
    pub const ALL: [RelationType; 6] = [
        Self::Family,
        Self::Friend,
        Self::AssociatedWith,
        Self::LocatedAt,
        Self::Temporal,
        Self::Emotional,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Family => "family",
            Self::Friend => "friend",
            Self::AssociatedWith => "associated_with",
            Self::LocatedAt => "located_at",
            Self::Temporal => "temporal",
            Self::Emotional => "emotional",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, typed, weighted edge between two memories of the same subject.
/// Endpoints are referenced by id, never by pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRelation {
    pub id: String,
    pub subject_id: String,
    pub source_id: String,
    pub target_id: String,
    pub relation_type: RelationType,
    /// 0.0–1.0.
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MemoryRelation {
    pub fn new(
        subject_id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relation_type: RelationType,
        weight: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: super::new_id(),
            subject_id: subject_id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation_type,
            weight,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.weight) {
            return Err(ValidationError::AttributeOutOfRange {
                field: "weight".to_string(),
                value: self.weight,
            });
        }
        Ok(())
    }
}
