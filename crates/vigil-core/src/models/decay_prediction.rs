use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MemoryEntity;

/// The attributes a decay strategy is allowed to look at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayInput {
    pub recall_strength: f64,
    pub emotional_weight: f64,
    pub importance: f64,
    pub days_since_access: f64,
}

impl DecayInput {
    pub fn from_entity(entity: &MemoryEntity, now: DateTime<Utc>) -> Self {
        Self {
            recall_strength: entity.recall_strength,
            emotional_weight: entity.emotional_weight,
            importance: entity.importance,
            days_since_access: entity.days_since_access(now),
        }
    }

    /// Same memory, `extra_days` further from its last recall.
    pub fn aged_by(self, extra_days: f64) -> Self {
        Self {
            days_since_access: self.days_since_access + extra_days,
            ..self
        }
    }
}

/// How long until a memory reaches the critical decay probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum CriticalHorizon {
    /// Reached within this many days (0 = already critical).
    Days(u32),
    /// Not reached within the prediction horizon.
    Unbounded,
}

impl CriticalHorizon {
    pub fn days(self) -> Option<u32> {
        match self {
            Self::Days(d) => Some(d),
            Self::Unbounded => None,
        }
    }
}

/// Coarse decay risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayRiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl DecayRiskLevel {
    /// Bands: <0.3 low, <0.6 medium, <0.85 high, else critical.
    pub fn from_probability(p: f64) -> Self {
        if p >= 0.85 {
            Self::Critical
        } else if p >= 0.6 {
            Self::High
        } else if p >= 0.3 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for DecayRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected recall strength some days from now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthProjection {
    pub days_ahead: u32,
    pub recall_strength: f64,
}

/// Derived decay outlook for one memory. Recomputed on demand, never stored
/// as the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayPrediction {
    pub memory_id: String,
    pub subject_id: String,
    /// 0.0–1.0.
    pub probability: f64,
    pub days_until_critical: CriticalHorizon,
    pub intervention_recommended: bool,
    pub risk_level: DecayRiskLevel,
    pub projections: Vec<StrengthProjection>,
    /// Name of the strategy that produced the probability.
    pub strategy: String,
    pub computed_at: DateTime<Utc>,
}
