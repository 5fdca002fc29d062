use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A submitted questionnaire. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: String,
    pub subject_id: String,
    /// Indicator key → response in 1..=5.
    pub responses: BTreeMap<String, u8>,
    pub submitted_at: DateTime<Utc>,
}

impl Assessment {
    pub fn new(
        subject_id: impl Into<String>,
        responses: BTreeMap<String, u8>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: super::new_id(),
            subject_id: subject_id.into(),
            responses,
            submitted_at,
        }
    }
}
