//! Intervention reads and caller actions (complete / skip / cancel).

use chrono::{DateTime, Utc};
use tracing::warn;

use vigil_core::errors::VigilResult;
use vigil_core::models::{Intervention, InterventionAction, InterventionOutcome, InterventionStatus};

use crate::engine::VigilEngine;

impl VigilEngine {
    /// Most recent scheduled-for first, ties by newest creation.
    pub fn list_interventions(
        &self,
        subject_id: &str,
        status: Option<InterventionStatus>,
    ) -> VigilResult<Vec<Intervention>> {
        self.get_subject(subject_id)?;
        self.scheduler.list(subject_id, status)
    }

    pub fn get_intervention(&self, intervention_id: &str) -> VigilResult<Intervention> {
        self.scheduler.get(intervention_id)
    }

    /// Apply a caller action. Illegal moves fail with `InvalidTransition`
    /// carrying the current status; skip and cancel during a dispatch fail
    /// with `DispatchInProgress`.
    ///
    /// Completing a decay-triggered intervention with a successful outcome
    /// counts as a recall of the linked memory.
    pub fn acknowledge(
        &self,
        intervention_id: &str,
        action: InterventionAction,
        outcome: Option<InterventionOutcome>,
    ) -> VigilResult<Intervention> {
        let subject_id = self.scheduler.get(intervention_id)?.subject_id;
        let now = self.clock.now();
        let updated = self.scheduler.transact(&subject_id, |book| {
            let updated = book.act(intervention_id, action, outcome, now)?;
            self.storage
                .upsert_interventions(std::slice::from_ref(&updated))?;
            Ok(updated)
        })?;

        self.record_metrics(|m| match updated.status {
            InterventionStatus::Completed => m.interventions.completed += 1,
            InterventionStatus::Skipped => m.interventions.skipped += 1,
            _ => {}
        });
        tracing::info!(
            intervention_id = %updated.id,
            action = %action.as_str(),
            status = %updated.status,
            "intervention acknowledged"
        );

        if updated.status == InterventionStatus::Completed
            && updated.outcome.as_ref().is_some_and(|o| o.success)
        {
            self.reinforce(&updated, now);
        }
        Ok(updated)
    }

    // The completion is already committed; a failed reinforcement is only logged.
    fn reinforce(&self, intervention: &Intervention, now: DateTime<Utc>) {
        let Some(memory_id) = &intervention.memory_id else {
            return;
        };
        let delta = self.config.decay.recall_reinforcement;
        let result = self.graphs.record_recall_then(
            &intervention.subject_id,
            memory_id,
            delta,
            now,
            |entity| self.storage.upsert_memory(entity),
        );
        if let Err(e) = result {
            warn!(
                intervention_id = %intervention.id,
                memory_id = %memory_id,
                error = %e,
                "memory reinforcement skipped"
            );
        }
    }
}
