use vigil_core::errors::VigilResult;
use vigil_core::models::TrendReport;

use crate::engine::VigilEngine;

impl VigilEngine {
    /// Trend over the last `window_days` (default from config). Fewer than
    /// two scores in the window is `NoData`, never `stable`.
    pub fn get_trend(&self, subject_id: &str, window_days: Option<i64>) -> VigilResult<TrendReport> {
        self.get_subject(subject_id)?;
        let window = window_days.unwrap_or(self.config.trends.default_window_days);
        self.trends.report(subject_id, window, self.clock.now())
    }
}
