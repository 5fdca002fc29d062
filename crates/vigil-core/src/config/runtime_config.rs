use serde::{Deserialize, Serialize};

use super::defaults;

/// Worker pool and background sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub worker_count: usize,
    pub sweep_interval_secs: u64,
    /// Capacity of the intervention-due broadcast channel.
    pub event_buffer: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_count: defaults::DEFAULT_WORKER_COUNT,
            sweep_interval_secs: defaults::DEFAULT_SWEEP_INTERVAL_SECS,
            event_buffer: defaults::DEFAULT_EVENT_BUFFER,
        }
    }
}
