use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use vigil_core::clock::{days_saturating, saturating_sub};
use vigil_core::config::TrendConfig;
use vigil_core::errors::{ValidationError, VigilResult};
use vigil_core::models::{ScorePoint, TrendReport, TrendSummary};

use crate::direction::{direction_by_thirds, mean};

/// Per-subject score timelines, kept sorted by time.
pub struct TrendTracker {
    series: DashMap<String, Vec<ScorePoint>>,
    noise_margin: f64,
    retention: Duration,
}

impl TrendTracker {
    pub fn new(config: &TrendConfig) -> Self {
        Self {
            series: DashMap::new(),
            noise_margin: config.noise_margin,
            retention: days_saturating(config.retention_days),
        }
    }

    /// Add one composite score. Points older than the retention period
    /// (relative to `now`) are dropped.
    pub fn record(&self, subject_id: &str, point: ScorePoint, now: DateTime<Utc>) {
        let cutoff = saturating_sub(now, self.retention);
        let mut entry = self.series.entry(subject_id.to_string()).or_default();
        let pos = entry.partition_point(|p| p.at <= point.at);
        entry.insert(pos, point);
        entry.retain(|p| p.at >= cutoff);
    }

    /// Replace a subject's timeline, e.g. when rebuilding from storage.
    pub fn load(&self, subject_id: &str, mut points: Vec<ScorePoint>) {
        points.sort_by(|a, b| a.at.cmp(&b.at));
        self.series.insert(subject_id.to_string(), points);
    }

    pub fn point_count(&self, subject_id: &str) -> usize {
        self.series.get(subject_id).map_or(0, |s| s.len())
    }

    /// Summary of points in `[now − window_days, now]`, or `NoData` below two points.
    /// A window reaching past the earliest representable time covers everything.
    pub fn report(
        &self,
        subject_id: &str,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> VigilResult<TrendReport> {
        if window_days < 1 {
            return Err(ValidationError::InvalidWindow { days: window_days }.into());
        }
        let from = saturating_sub(now, days_saturating(window_days));
        let in_window: Vec<ScorePoint> = self
            .series
            .get(subject_id)
            .map(|s| {
                s.iter()
                    .filter(|p| p.at >= from && p.at <= now)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        if in_window.len() < 2 {
            return Ok(TrendReport::NoData {
                subject_id: subject_id.to_string(),
                window_days,
                count: in_window.len(),
            });
        }

        let values: Vec<f64> = in_window.iter().map(|p| p.composite).collect();
        Ok(TrendReport::Trend(TrendSummary {
            subject_id: subject_id.to_string(),
            window_days,
            count: values.len(),
            mean: mean(&values),
            direction: direction_by_thirds(&values, self.noise_margin),
            latest: values[values.len() - 1],
            series: in_window,
        }))
    }
}

impl Default for TrendTracker {
    fn default() -> Self {
        Self::new(&TrendConfig::default())
    }
}
