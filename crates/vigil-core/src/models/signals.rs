use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw clinical or behavioral features, each already scaled to 0.0–1.0
/// where higher means more concerning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    pub id: String,
    pub subject_id: String,
    pub features: BTreeMap<String, f64>,
    pub observed_at: DateTime<Utc>,
}

impl SignalSet {
    pub fn new(
        subject_id: impl Into<String>,
        features: BTreeMap<String, f64>,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: super::new_id(),
            subject_id: subject_id.into(),
            features,
            observed_at,
        }
    }
}
