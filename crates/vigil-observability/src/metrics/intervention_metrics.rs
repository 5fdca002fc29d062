//! Intervention lifecycle counters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterventionMetrics {
    pub created: u64,
    pub coalesced: u64,
    pub delivered: u64,
    pub delivery_retries: u64,
    pub failed: u64,
    /// Delivered but never confirmed within the confirmation window.
    pub expired: u64,
    pub completed: u64,
    pub skipped: u64,
}

impl InterventionMetrics {
    pub fn record_proposal(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.coalesced += 1;
        }
    }

    /// Share of proposals that were folded into an existing intervention.
    pub fn coalesce_rate(&self) -> f64 {
        let total = self.created + self.coalesced;
        if total == 0 {
            0.0
        } else {
            self.coalesced as f64 / total as f64
        }
    }
}
