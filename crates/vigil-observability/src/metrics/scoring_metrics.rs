//! Scores produced, by source and tier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use vigil_core::models::RiskTier;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringMetrics {
    pub assessments_scored: u64,
    pub signal_sets_scored: u64,
    /// Requests rejected before anything was persisted.
    pub rejected: u64,
    pub tier_distribution: HashMap<String, u64>,
}

impl ScoringMetrics {
    pub fn record_assessment(&mut self, tier: RiskTier) {
        self.assessments_scored += 1;
        self.record_tier(tier);
    }

    pub fn record_signals(&mut self, tier: RiskTier) {
        self.signal_sets_scored += 1;
        self.record_tier(tier);
    }

    pub fn record_rejection(&mut self) {
        self.rejected += 1;
    }

    pub fn total_scored(&self) -> u64 {
        self.assessments_scored + self.signal_sets_scored
    }

    fn record_tier(&mut self, tier: RiskTier) {
        *self
            .tier_distribution
            .entry(tier.as_str().to_string())
            .or_default() += 1;
    }
}
