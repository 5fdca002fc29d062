//! InterventionScheduler: per-subject books behind per-subject locks.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::{debug, warn};

use vigil_core::clock::secs_saturating;
use vigil_core::config::SchedulerConfig;
use vigil_core::errors::{DeliveryError, RecordKind, VigilError, VigilResult};
use vigil_core::models::{
    Intervention, InterventionAction, InterventionOutcome, InterventionStatus, InterventionType,
};

use crate::backoff::Backoff;
use crate::book::{Proposal, Settlement, SubjectBook};

type SharedBook = Arc<Mutex<SubjectBook>>;

/// A claimed intervention, ready to dispatch outside any lock.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchTicket {
    pub subject_id: String,
    pub intervention: Intervention,
}

pub struct InterventionScheduler {
    books: DashMap<String, SharedBook>,
    /// intervention id → subject id.
    index: DashMap<String, String>,
    backoff: Backoff,
    max_retries: u32,
    confirmation_window: Duration,
}

impl InterventionScheduler {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            books: DashMap::new(),
            index: DashMap::new(),
            backoff: Backoff::from_config(config),
            max_retries: config.max_retries,
            confirmation_window: secs_saturating(config.confirmation_window_secs),
        }
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Run `f` on a copy of the subject's book under the subject lock.
    /// The copy replaces the book only if `f` succeeds, so a failed
    /// request leaves no trace.
    pub fn transact<T>(
        &self,
        subject_id: &str,
        f: impl FnOnce(&mut SubjectBook) -> VigilResult<T>,
    ) -> VigilResult<T> {
        let shared = self.book(subject_id);
        let mut guard = shared.lock()?;
        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        for id in draft.ids() {
            if guard.get(id).is_none() {
                self.index.insert(id.clone(), subject_id.to_string());
            }
        }
        *guard = draft;
        Ok(out)
    }

    /// Offer one candidate, coalescing with an active intervention of the same type.
    pub fn propose(&self, candidate: Intervention, now: DateTime<Utc>) -> VigilResult<Proposal> {
        let subject_id = candidate.subject_id.clone();
        self.transact(&subject_id, |book| Ok(book.propose(candidate, now)))
    }

    /// Claim every due intervention across all subjects. Each subject's
    /// lock is held only while its own book is scanned.
    pub fn claim_due(&self, now: DateTime<Utc>) -> VigilResult<Vec<DispatchTicket>> {
        let mut tickets = Vec::new();
        for (subject_id, shared) in self.snapshot_books() {
            let claimed = shared.lock()?.claim_due(now);
            tickets.extend(claimed.into_iter().map(|intervention| DispatchTicket {
                subject_id: subject_id.clone(),
                intervention,
            }));
        }
        Ok(tickets)
    }

    pub fn settle(
        &self,
        ticket: &DispatchTicket,
        result: Result<(), DeliveryError>,
        now: DateTime<Utc>,
    ) -> VigilResult<Settlement> {
        self.settle_then(ticket, result, now, |_| {})
    }

    /// Settle, then run `after` before the subject lock is released, so
    /// whatever it records cannot interleave with another write for the subject.
    pub fn settle_then(
        &self,
        ticket: &DispatchTicket,
        result: Result<(), DeliveryError>,
        now: DateTime<Utc>,
        after: impl FnOnce(&Settlement),
    ) -> VigilResult<Settlement> {
        let shared = self.book(&ticket.subject_id);
        let mut guard = shared.lock()?;
        let settlement = guard.settle(
            &ticket.intervention.id,
            result,
            now,
            &self.backoff,
            self.max_retries,
        )?;
        after(&settlement);
        drop(guard);
        match &settlement {
            Settlement::Stale { intervention_id } => {
                warn!(intervention_id = %intervention_id, "stale dispatch ticket ignored");
            }
            other => {
                if let Some(i) = other.intervention() {
                    debug!(intervention_id = %i.id, status = %i.status, "dispatch settled");
                }
            }
        }
        Ok(settlement)
    }

    /// Fail delivered interventions left unconfirmed past the confirmation window.
    pub fn expire_unconfirmed(&self, now: DateTime<Utc>) -> VigilResult<Vec<Intervention>> {
        self.expire_unconfirmed_then(now, |_| {})
    }

    /// As [`expire_unconfirmed`](Self::expire_unconfirmed); `after` sees each
    /// subject's non-empty batch while that subject's lock is held.
    pub fn expire_unconfirmed_then(
        &self,
        now: DateTime<Utc>,
        mut after: impl FnMut(&[Intervention]),
    ) -> VigilResult<Vec<Intervention>> {
        let mut expired = Vec::new();
        for (_, shared) in self.snapshot_books() {
            let mut guard = shared.lock()?;
            let mut batch = guard.expire_unconfirmed(now, self.confirmation_window)?;
            if !batch.is_empty() {
                after(&batch);
            }
            drop(guard);
            expired.append(&mut batch);
        }
        Ok(expired)
    }

    pub fn act(
        &self,
        intervention_id: &str,
        action: InterventionAction,
        outcome: Option<InterventionOutcome>,
        now: DateTime<Utc>,
    ) -> VigilResult<Intervention> {
        let subject_id = self.subject_of(intervention_id)?;
        self.transact(&subject_id, |book| {
            book.act(intervention_id, action, outcome, now)
        })
    }

    pub fn get(&self, intervention_id: &str) -> VigilResult<Intervention> {
        let subject_id = self.subject_of(intervention_id)?;
        let shared = self.book(&subject_id);
        let found = shared.lock()?.get(intervention_id).cloned();
        found.ok_or_else(|| VigilError::not_found(RecordKind::Intervention, intervention_id))
    }

    pub fn list(
        &self,
        subject_id: &str,
        status: Option<InterventionStatus>,
    ) -> VigilResult<Vec<Intervention>> {
        let Some(shared) = self.existing_book(subject_id) else {
            return Ok(Vec::new());
        };
        let listed = shared.lock()?.list(status);
        Ok(listed)
    }

    pub fn active_of_type(
        &self,
        subject_id: &str,
        intervention_type: InterventionType,
    ) -> VigilResult<Option<Intervention>> {
        let Some(shared) = self.existing_book(subject_id) else {
            return Ok(None);
        };
        let found = shared.lock()?.active_of_type(intervention_type).cloned();
        Ok(found)
    }

    /// Rebuild books from stored interventions.
    pub fn load(&self, interventions: Vec<Intervention>) -> VigilResult<()> {
        for intervention in interventions {
            let subject_id = intervention.subject_id.clone();
            self.index
                .insert(intervention.id.clone(), subject_id.clone());
            self.book(&subject_id).lock()?.restore(intervention);
        }
        Ok(())
    }

    fn subject_of(&self, intervention_id: &str) -> VigilResult<String> {
        self.index
            .get(intervention_id)
            .map(|s| s.value().clone())
            .ok_or_else(|| VigilError::not_found(RecordKind::Intervention, intervention_id))
    }

    fn book(&self, subject_id: &str) -> SharedBook {
        let entry = self
            .books
            .entry(subject_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SubjectBook::new(subject_id))));
        Arc::clone(entry.value())
    }

    fn existing_book(&self, subject_id: &str) -> Option<SharedBook> {
        self.books.get(subject_id).map(|b| Arc::clone(b.value()))
    }

    // Collect Arcs first so no DashMap shard guard is held while a book is locked.
    fn snapshot_books(&self) -> Vec<(String, SharedBook)> {
        self.books
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect()
    }
}

impl Default for InterventionScheduler {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default())
    }
}
