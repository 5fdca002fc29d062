//! Sweep runs and dispatch latency.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Dispatch latencies kept for the average.
const MAX_SAMPLES: usize = 1_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepMetrics {
    pub sweeps_run: u64,
    pub claimed: u64,
    pub dispatch_timeouts: u64,
    dispatch_latencies_ms: Vec<u64>,
}

impl SweepMetrics {
    pub fn record_sweep(&mut self, claimed: usize) {
        self.sweeps_run += 1;
        self.claimed += claimed as u64;
    }

    pub fn record_dispatch(&mut self, elapsed: Duration) {
        self.dispatch_latencies_ms
            .push(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
        if self.dispatch_latencies_ms.len() > MAX_SAMPLES {
            let excess = self.dispatch_latencies_ms.len() - MAX_SAMPLES;
            self.dispatch_latencies_ms.drain(..excess);
        }
    }

    pub fn record_timeout(&mut self) {
        self.dispatch_timeouts += 1;
    }

    pub fn avg_dispatch_ms(&self) -> f64 {
        if self.dispatch_latencies_ms.is_empty() {
            return 0.0;
        }
        let total: u64 = self.dispatch_latencies_ms.iter().sum();
        total as f64 / self.dispatch_latencies_ms.len() as f64
    }
}
