use chrono::Duration;

use vigil_core::clock::secs_saturating;
use vigil_core::config::SchedulerConfig;

/// Exponential retry delay: `min(base × factor^(n−1), cap)` for retry `n ≥ 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base_secs: u64,
    factor: u32,
    cap_secs: u64,
}

impl Backoff {
    pub fn new(base_secs: u64, factor: u32, cap_secs: u64) -> Self {
        Self {
            base_secs,
            factor: factor.max(1),
            cap_secs,
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(
            config.backoff_base_secs,
            config.backoff_factor,
            config.backoff_cap_secs,
        )
    }

    /// Delay before retry `retry` (1-based). Retry 0 is treated as retry 1.
    pub fn delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        let multiplier = u64::from(self.factor).saturating_pow(exponent);
        let secs = self.base_secs.saturating_mul(multiplier).min(self.cap_secs);
        secs_saturating(secs)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::from_config(&SchedulerConfig::default())
    }
}
