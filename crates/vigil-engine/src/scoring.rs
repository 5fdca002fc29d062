//! Assessment and signal submission.
//!
//! A submission is scored outside any lock, then planned and committed under
//! the subject's lock: the assessment (or signal set), its score, and any
//! intervention it triggers are written in one storage transaction, and the
//! subject's book is only updated after that transaction succeeds.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use vigil_core::errors::VigilResult;
use vigil_core::models::{Assessment, Intervention, ScorePoint, ScoreResult, SignalSet};
use vigil_core::traits::ScoreCommit;
use vigil_observability::scoring_span;
use vigil_observability::tracing_setup::events;

use crate::engine::VigilEngine;

/// What a submission produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub score: ScoreResult,
    /// The intervention the score created or was folded into. None below tier `high`.
    pub intervention: Option<Intervention>,
    /// True when an active intervention of the same type absorbed the recommendation.
    pub coalesced: bool,
}

impl VigilEngine {
    /// Score a questionnaire (indicator → answer in 1..=5) for an active subject.
    pub fn submit_assessment(
        &self,
        subject_id: &str,
        responses: BTreeMap<String, u8>,
    ) -> VigilResult<ScoreOutcome> {
        let _span = scoring_span!(subject_id, "assessment").entered();
        self.active_subject(subject_id)?;
        let now = self.clock.now();
        let assessment = Assessment::new(subject_id, responses, now);
        let score = self
            .aggregator
            .score_assessment(&assessment, now)
            .inspect_err(|_| self.record_metrics(|m| m.scoring.record_rejection()))?;
        let outcome = self.commit_score(Some(&assessment), None, score, now)?;
        self.record_metrics(|m| m.scoring.record_assessment(outcome.score.tier));
        Ok(outcome)
    }

    /// Score raw features (each 0.0–1.0) through the configured score model.
    pub fn submit_signals(
        &self,
        subject_id: &str,
        features: BTreeMap<String, f64>,
    ) -> VigilResult<ScoreOutcome> {
        let _span = scoring_span!(subject_id, "signals").entered();
        self.active_subject(subject_id)?;
        let now = self.clock.now();
        let signals = SignalSet::new(subject_id, features, now);
        let score = self
            .aggregator
            .score_signals(&signals, self.score_model.as_ref(), now)
            .inspect_err(|_| self.record_metrics(|m| m.scoring.record_rejection()))?;
        let outcome = self.commit_score(None, Some(&signals), score, now)?;
        self.record_metrics(|m| m.scoring.record_signals(outcome.score.tier));
        Ok(outcome)
    }

    /// Score history for a subject in `[from, to]`, oldest first, read from storage.
    pub fn score_history(
        &self,
        subject_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> VigilResult<Vec<ScoreResult>> {
        self.get_subject(subject_id)?;
        self.storage.score_results(subject_id, from, to)
    }

    pub fn get_assessment(&self, assessment_id: &str) -> VigilResult<Option<Assessment>> {
        self.storage.get_assessment(assessment_id)
    }

    fn commit_score(
        &self,
        assessment: Option<&Assessment>,
        signals: Option<&SignalSet>,
        score: ScoreResult,
        now: DateTime<Utc>,
    ) -> VigilResult<ScoreOutcome> {
        let candidate = self.planner.for_score(&score, now);
        let proposal = self.scheduler.transact(&score.subject_id, |book| {
            let proposal = candidate.map(|c| book.propose(c, now));
            let interventions: Vec<Intervention> =
                proposal.iter().map(|p| p.intervention().clone()).collect();
            self.storage.commit_score(ScoreCommit {
                assessment,
                signals,
                score: &score,
                interventions: &interventions,
            })?;
            Ok(proposal)
        })?;

        self.trends.record(
            &score.subject_id,
            ScorePoint {
                at: score.created_at,
                composite: score.composite,
            },
            now,
        );
        events::assessment_scored(&score.subject_id, &score.id, score.composite, score.tier.as_str());
        if let Some(p) = &proposal {
            self.note_proposal(p);
        }

        Ok(ScoreOutcome {
            coalesced: proposal.as_ref().is_some_and(|p| !p.is_created()),
            intervention: proposal.map(|p| p.intervention().clone()),
            score,
        })
    }
}
