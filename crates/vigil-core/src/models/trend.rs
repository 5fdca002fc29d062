use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

/// One composite score on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub at: DateTime<Utc>,
    pub composite: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub subject_id: String,
    pub window_days: i64,
    pub count: usize,
    pub mean: f64,
    pub direction: TrendDirection,
    pub latest: f64,
    /// Chronological.
    pub series: Vec<ScorePoint>,
}

/// Trend read result. `NoData` is distinct from a stable trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendReport {
    NoData {
        subject_id: String,
        window_days: i64,
        count: usize,
    },
    Trend(TrendSummary),
}

impl TrendReport {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }

    pub fn direction(&self) -> Option<TrendDirection> {
        match self {
            Self::NoData { .. } => None,
            Self::Trend(summary) => Some(summary.direction),
        }
    }
}
