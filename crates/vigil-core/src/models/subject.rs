use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a subject is the person being cared for or the one caring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Patient,
    Caregiver,
}

impl SubjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Caregiver => "caregiver",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "patient" => Some(Self::Patient),
            "caregiver" => Some(Self::Caregiver),
            _ => None,
        }
    }
}

/// A patient or caregiver enrolled in the engine. Never deleted, only deactivated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub kind: SubjectKind,
    pub display_name: String,
    pub active: bool,
    pub enrolled_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivated_at: Option<DateTime<Utc>>,
}

impl Subject {
    pub fn enroll(kind: SubjectKind, display_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: super::new_id(),
            kind,
            display_name: display_name.into(),
            active: true,
            enrolled_at: now,
            deactivated_at: None,
        }
    }

    /// Only patients own a memory graph.
    pub fn has_memory_graph(&self) -> bool {
        self.kind == SubjectKind::Patient
    }
}
