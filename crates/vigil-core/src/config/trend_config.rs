use serde::{Deserialize, Serialize};

use super::defaults;

/// Trend tracking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub default_window_days: i64,
    /// Minimum difference between earliest and latest thirds to count as a trend.
    pub noise_margin: f64,
    /// Points older than this are dropped from the in-memory series.
    pub retention_days: i64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            default_window_days: defaults::DEFAULT_TREND_WINDOW_DAYS,
            noise_margin: defaults::DEFAULT_NOISE_MARGIN,
            retention_days: defaults::DEFAULT_TREND_RETENTION_DAYS,
        }
    }
}
