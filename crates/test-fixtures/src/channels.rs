//! Scripted delivery channels.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use vigil_core::errors::DeliveryError;
use vigil_core::models::Intervention;
use vigil_core::traits::IDeliveryChannel;

/// Acknowledges every dispatch and remembers what it was sent.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<Intervention>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Intervention> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn record(&self, intervention: &Intervention) {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(intervention.clone());
    }
}

#[async_trait]
impl IDeliveryChannel for RecordingChannel {
    async fn dispatch(&self, intervention: &Intervention) -> Result<(), DeliveryError> {
        self.record(intervention);
        Ok(())
    }
}

/// Fails the first `failures` dispatches, then behaves like [`RecordingChannel`].
#[derive(Debug, Default)]
pub struct FlakyChannel {
    remaining_failures: AtomicU32,
    attempts: AtomicU32,
    inner: RecordingChannel,
}

impl FlakyChannel {
    pub fn new(failures: u32) -> Self {
        Self {
            remaining_failures: AtomicU32::new(failures),
            attempts: AtomicU32::new(0),
            inner: RecordingChannel::new(),
        }
    }

    /// A channel that never succeeds.
    pub fn always_failing() -> Self {
        Self::new(u32::MAX)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Intervention> {
        self.inner.sent()
    }
}

#[async_trait]
impl IDeliveryChannel for FlakyChannel {
    async fn dispatch(&self, intervention: &Intervention) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(DeliveryError::Unavailable {
                reason: "scripted outage".to_string(),
            });
        }
        self.inner.record(intervention);
        Ok(())
    }
}

/// Waits `delay` before acknowledging, to exercise dispatch timeouts.
#[derive(Debug)]
pub struct StallingChannel {
    delay: Duration,
    inner: RecordingChannel,
}

impl StallingChannel {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: RecordingChannel::new(),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.inner.sent_count()
    }
}

#[async_trait]
impl IDeliveryChannel for StallingChannel {
    async fn dispatch(&self, intervention: &Intervention) -> Result<(), DeliveryError> {
        tokio::time::sleep(self.delay).await;
        self.inner.record(intervention);
        Ok(())
    }
}
