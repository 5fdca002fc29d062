//! SubjectBook: every intervention one subject owns.
//!
//! A book is only ever touched under its subject's lock, so the checks here
//! (one active intervention per type, nothing in flight cancelled) hold
//! without further synchronization.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use vigil_core::clock::saturating_add;
use vigil_core::errors::{DeliveryError, RecordKind, VigilError, VigilResult};
use vigil_core::models::{
    Intervention, InterventionAction, InterventionDueEvent, InterventionOutcome,
    InterventionStatus, InterventionType,
};

use crate::backoff::Backoff;

/// Result of offering a candidate to a book.
#[derive(Debug, Clone, PartialEq)]
pub enum Proposal {
    /// No active intervention of that type existed; the candidate was added.
    Created(Intervention),
    /// Merged into the existing active intervention of the same type.
    Coalesced {
        intervention: Intervention,
        previous_scheduled_for: DateTime<Utc>,
    },
}

impl Proposal {
    pub fn intervention(&self) -> &Intervention {
        match self {
            Self::Created(i) => i,
            Self::Coalesced { intervention, .. } => intervention,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Result of recording one dispatch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    Delivered {
        intervention: Intervention,
        event: InterventionDueEvent,
    },
    RetryScheduled {
        intervention: Intervention,
        retry: u32,
        retry_at: DateTime<Utc>,
        error: DeliveryError,
    },
    Failed {
        intervention: Intervention,
        error: DeliveryError,
    },
    /// The claim no longer matches the book; nothing changed.
    Stale { intervention_id: String },
}

impl Settlement {
    pub fn intervention(&self) -> Option<&Intervention> {
        match self {
            Self::Delivered { intervention, .. }
            | Self::RetryScheduled { intervention, .. }
            | Self::Failed { intervention, .. } => Some(intervention),
            Self::Stale { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubjectBook {
    subject_id: String,
    interventions: HashMap<String, Intervention>,
    in_flight: HashSet<String>,
}

impl SubjectBook {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            ..Self::default()
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn len(&self) -> usize {
        self.interventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interventions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Intervention> {
        self.interventions.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.interventions.keys()
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    pub fn active_of_type(&self, intervention_type: InterventionType) -> Option<&Intervention> {
        self.interventions
            .values()
            .find(|i| i.intervention_type == intervention_type && i.is_active())
    }

    /// Put a stored intervention back into the book as-is.
    pub fn restore(&mut self, intervention: Intervention) {
        self.interventions
            .insert(intervention.id.clone(), intervention);
    }

    /// Add `candidate`, or coalesce it into the active intervention of the
    /// same type, moving that one's time earlier if the candidate is earlier.
    pub fn propose(&mut self, candidate: Intervention, now: DateTime<Utc>) -> Proposal {
        let existing_id = self
            .active_of_type(candidate.intervention_type)
            .map(|i| i.id.clone());
        let Some(existing) = existing_id.and_then(|id| self.interventions.get_mut(&id)) else {
            self.interventions
                .insert(candidate.id.clone(), candidate.clone());
            return Proposal::Created(candidate);
        };

        let previous_scheduled_for = existing.scheduled_for;
        if existing.status == InterventionStatus::Scheduled
            && candidate.scheduled_for < existing.scheduled_for
        {
            existing.scheduled_for = candidate.scheduled_for;
            existing.updated_at = now;
        }
        for anchor in candidate.anchors {
            if !existing.anchors.contains(&anchor) {
                existing.anchors.push(anchor);
            }
        }
        existing
            .anchors
            .truncate(vigil_core::constants::MAX_INTERVENTION_ANCHORS);
        Proposal::Coalesced {
            intervention: existing.clone(),
            previous_scheduled_for,
        }
    }

    /// Mark every due intervention in flight and hand back copies, oldest first.
    pub fn claim_due(&mut self, now: DateTime<Utc>) -> Vec<Intervention> {
        let mut due: Vec<Intervention> = self
            .interventions
            .values()
            .filter(|i| i.is_due(now) && !self.in_flight.contains(&i.id))
            .cloned()
            .collect();
        due.sort_by(|a, b| a.scheduled_for.cmp(&b.scheduled_for).then_with(|| a.id.cmp(&b.id)));
        for i in &due {
            self.in_flight.insert(i.id.clone());
        }
        due
    }

    /// Record the outcome of dispatching a claimed intervention.
    ///
    /// `max_retries` retries follow the first attempt; the failure after the
    /// last retry is terminal.
    pub fn settle(
        &mut self,
        id: &str,
        result: Result<(), DeliveryError>,
        now: DateTime<Utc>,
        backoff: &Backoff,
        max_retries: u32,
    ) -> VigilResult<Settlement> {
        let stale = || Settlement::Stale {
            intervention_id: id.to_string(),
        };
        if !self.in_flight.remove(id) {
            return Ok(stale());
        }
        let Some(intervention) = self.interventions.get_mut(id) else {
            return Ok(stale());
        };
        if intervention.status != InterventionStatus::Scheduled {
            return Ok(stale());
        }

        match result {
            Ok(()) => {
                intervention.transition(InterventionStatus::Delivered, now)?;
                let event = InterventionDueEvent {
                    intervention_id: intervention.id.clone(),
                    subject_id: intervention.subject_id.clone(),
                    intervention_type: intervention.intervention_type,
                    title: intervention.title.clone(),
                    memory_id: intervention.memory_id.clone(),
                    delivered_at: now,
                };
                Ok(Settlement::Delivered {
                    intervention: intervention.clone(),
                    event,
                })
            }
            Err(error) => {
                intervention.delivery_failures += 1;
                let failures = intervention.delivery_failures;
                if failures > max_retries {
                    intervention.next_attempt_at = None;
                    intervention.transition(InterventionStatus::Failed, now)?;
                    Ok(Settlement::Failed {
                        intervention: intervention.clone(),
                        error,
                    })
                } else {
                    let retry_at = saturating_add(now, backoff.delay(failures));
                    intervention.next_attempt_at = Some(retry_at);
                    intervention.updated_at = now;
                    Ok(Settlement::RetryScheduled {
                        intervention: intervention.clone(),
                        retry: failures,
                        retry_at,
                        error,
                    })
                }
            }
        }
    }

    /// Fail delivered interventions nobody confirmed within `window`.
    pub fn expire_unconfirmed(
        &mut self,
        now: DateTime<Utc>,
        window: Duration,
    ) -> VigilResult<Vec<Intervention>> {
        let mut expired = Vec::new();
        for intervention in self.interventions.values_mut() {
            let overdue = intervention.status == InterventionStatus::Delivered
                && intervention
                    .delivered_at
                    .is_some_and(|at| saturating_add(at, window) <= now);
            if overdue {
                intervention.transition(InterventionStatus::Failed, now)?;
                expired.push(intervention.clone());
            }
        }
        Ok(expired)
    }

    /// Apply a caller action. Skip and cancel are refused while a dispatch is
    /// in flight; everything else follows the lifecycle rules.
    pub fn act(
        &mut self,
        id: &str,
        action: InterventionAction,
        outcome: Option<InterventionOutcome>,
        now: DateTime<Utc>,
    ) -> VigilResult<Intervention> {
        if action != InterventionAction::Complete && self.in_flight.contains(id) {
            return Err(VigilError::DispatchInProgress {
                intervention_id: id.to_string(),
            });
        }
        let intervention = self
            .interventions
            .get_mut(id)
            .ok_or_else(|| VigilError::not_found(RecordKind::Intervention, id))?;
        intervention.apply(action.target_status(), action.as_str(), now)?;
        match action {
            InterventionAction::Cancel => intervention.cancelled = true,
            InterventionAction::Complete => intervention.outcome = outcome,
            InterventionAction::Skip => {}
        }
        Ok(intervention.clone())
    }

    /// Most recent scheduled-for first, ties broken by newest creation.
    pub fn list(&self, status: Option<InterventionStatus>) -> Vec<Intervention> {
        let mut out: Vec<Intervention> = self
            .interventions
            .values()
            .filter(|i| status.map_or(true, |s| i.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.scheduled_for
                .cmp(&a.scheduled_for)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        out
    }
}
