//! The due-intervention sweep.
//!
//! 1. Expire delivered interventions nobody confirmed in time.
//! 2. Claim everything due (marks it in flight under the subject lock).
//! 3. Dispatch each claim with a bounded timeout, no lock held, at most
//!    `worker_count` at once.
//! 4. Settle each result under the subject lock and persist it there.
//!
//! Running the sweep twice on the same state changes nothing the second time:
//! delivered interventions are no longer due, and retries wait out their backoff.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{warn, Instrument};

use vigil_core::errors::{DeliveryError, VigilResult};
use vigil_core::models::Intervention;
use vigil_core::traits::IDeliveryChannel;
use vigil_interventions::Settlement;
use vigil_observability::tracing_setup::events;
use vigil_observability::{dispatch_span, sweep_span};

use crate::engine::VigilEngine;

/// Counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub expired: usize,
    pub claimed: usize,
    pub delivered: usize,
    pub retried: usize,
    pub failed: usize,
    /// Claims whose intervention changed underneath them; nothing was recorded.
    pub stale: usize,
}

struct Dispatched {
    result: Result<(), DeliveryError>,
    elapsed: Duration,
}

impl VigilEngine {
    pub async fn sweep_once(&self) -> VigilResult<SweepReport> {
        let sweep = self.sweeps.fetch_add(1, Ordering::Relaxed) + 1;
        self.sweep(sweep).instrument(sweep_span!(sweep)).await
    }

    async fn sweep(&self, sweep: u64) -> VigilResult<SweepReport> {
        let now = self.clock.now();
        let mut report = SweepReport::default();

        let expired = self
            .scheduler
            .expire_unconfirmed_then(now, |batch| self.persist_best_effort("expire_unconfirmed", batch))?;
        for intervention in &expired {
            events::intervention_failed(&intervention.id, "no confirmation within window");
        }
        report.expired = expired.len();

        let tickets = self.scheduler.claim_due(now)?;
        report.claimed = tickets.len();
        self.record_metrics(|m| {
            m.interventions.expired += expired.len() as u64;
            m.sweeps.record_sweep(tickets.len());
        });

        let permits = Arc::new(Semaphore::new(self.config.runtime.worker_count));
        let limit = Duration::from_millis(self.config.scheduler.dispatch_timeout_ms);
        let mut pending = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let channel = Arc::clone(&self.channel);
            let permits = Arc::clone(&permits);
            let intervention = ticket.intervention.clone();
            let span = dispatch_span!(intervention.id, intervention.delivery_failures + 1);
            let handle = tokio::spawn(
                async move {
                    // The semaphore is never closed, so acquire cannot fail.
                    let _permit = permits.acquire_owned().await.ok();
                    dispatch(channel, intervention, limit).await
                }
                .instrument(span),
            );
            pending.push((ticket, handle));
        }

        for (ticket, handle) in pending {
            let dispatched = handle.await.unwrap_or_else(|e| Dispatched {
                result: Err(DeliveryError::Rejected {
                    reason: format!("dispatch task failed: {e}"),
                }),
                elapsed: Duration::ZERO,
            });
            let timed_out = matches!(dispatched.result, Err(DeliveryError::TimedOut { .. }));
            self.record_metrics(|m| {
                m.sweeps.record_dispatch(dispatched.elapsed);
                if timed_out {
                    m.sweeps.record_timeout();
                }
            });

            let settled = self.scheduler.settle_then(
                &ticket,
                dispatched.result,
                self.clock.now(),
                |settlement| {
                    if let Some(i) = settlement.intervention() {
                        self.persist_best_effort("settle_dispatch", std::slice::from_ref(i));
                    }
                },
            );
            match settled {
                Ok(settlement) => self.record_settlement(settlement, &mut report),
                Err(e) => warn!(
                    intervention_id = %ticket.intervention.id,
                    error = %e,
                    "dispatch result could not be settled"
                ),
            }
        }

        events::sweep_completed(report.claimed, report.delivered, report.retried, report.failed);
        tracing::debug!(sweep, expired = report.expired, stale = report.stale, "sweep finished");
        Ok(report)
    }

    fn record_settlement(&self, settlement: Settlement, report: &mut SweepReport) {
        match settlement {
            Settlement::Delivered {
                intervention,
                event,
            } => {
                report.delivered += 1;
                events::intervention_delivered(
                    &intervention.subject_id,
                    &intervention.id,
                    intervention.delivery_failures + 1,
                );
                self.record_metrics(|m| m.interventions.delivered += 1);
                // No subscribers is fine; the event is still logged above.
                let _ = self.events.send(event);
            }
            Settlement::RetryScheduled {
                intervention,
                retry,
                retry_at,
                error,
            } => {
                report.retried += 1;
                events::delivery_retry_scheduled(
                    &intervention.id,
                    retry,
                    &retry_at.to_rfc3339(),
                    &error.to_string(),
                );
                self.record_metrics(|m| m.interventions.delivery_retries += 1);
            }
            Settlement::Failed {
                intervention,
                error,
            } => {
                report.failed += 1;
                events::intervention_failed(&intervention.id, &error.to_string());
                self.record_metrics(|m| m.interventions.failed += 1);
            }
            Settlement::Stale { .. } => report.stale += 1,
        }
    }
}

async fn dispatch(
    channel: Arc<dyn IDeliveryChannel>,
    intervention: Intervention,
    limit: Duration,
) -> Dispatched {
    let started = Instant::now();
    let result = match tokio::time::timeout(limit, channel.dispatch(&intervention)).await {
        Ok(result) => result,
        Err(_) => Err(DeliveryError::TimedOut {
            timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    };
    Dispatched {
        result,
        elapsed: started.elapsed(),
    }
}
