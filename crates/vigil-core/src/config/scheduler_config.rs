use serde::{Deserialize, Serialize};

use super::defaults;

/// Intervention scheduling and delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Retries after the first failed dispatch before the intervention fails.
    pub max_retries: u32,
    pub backoff_base_secs: u64,
    pub backoff_factor: u32,
    pub backoff_cap_secs: u64,
    /// Upper bound on a single dispatch call (milliseconds).
    pub dispatch_timeout_ms: u64,
    /// Delay before a `high`-tier assessment intervention is scheduled (seconds).
    pub assessment_lead_secs: u64,
    /// How long a delivered intervention may wait for confirmation (seconds).
    pub confirmation_window_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            backoff_base_secs: defaults::DEFAULT_BACKOFF_BASE_SECS,
            backoff_factor: defaults::DEFAULT_BACKOFF_FACTOR,
            backoff_cap_secs: defaults::DEFAULT_BACKOFF_CAP_SECS,
            dispatch_timeout_ms: defaults::DEFAULT_DISPATCH_TIMEOUT_MS,
            assessment_lead_secs: defaults::DEFAULT_ASSESSMENT_LEAD_SECS,
            confirmation_window_secs: defaults::DEFAULT_CONFIRMATION_WINDOW_SECS,
        }
    }
}
