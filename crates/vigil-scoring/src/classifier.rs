use vigil_core::constants::{CRITICAL_THRESHOLD, HIGH_THRESHOLD, MODERATE_THRESHOLD};
use vigil_core::models::{RiskTier, Urgency};

/// Composite score → tier. Total and monotone over 0–100.
pub fn classify(composite: f64) -> RiskTier {
    if composite >= CRITICAL_THRESHOLD {
        RiskTier::Critical
    } else if composite >= HIGH_THRESHOLD {
        RiskTier::High
    } else if composite >= MODERATE_THRESHOLD {
        RiskTier::Moderate
    } else {
        RiskTier::Low
    }
}

pub fn urgency_for(tier: RiskTier) -> Urgency {
    match tier {
        RiskTier::Critical => Urgency::Urgent,
        RiskTier::High => Urgency::High,
        RiskTier::Moderate | RiskTier::Low => Urgency::Routine,
    }
}
