use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::InterventionType;

/// Emitted exactly once per intervention, when it transitions into `delivered`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionDueEvent {
    pub intervention_id: String,
    pub subject_id: String,
    pub intervention_type: InterventionType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_id: Option<String>,
    pub delivered_at: DateTime<Utc>,
}
