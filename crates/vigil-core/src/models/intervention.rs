use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RiskTier;
use crate::errors::{VigilError, VigilResult};

/// The 6 intervention types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionType {
    SpacedRepetition,
    ContextualAnchoring,
    MultimediaReinforcement,
    EmotionalPreservation,
    RoutineReminder,
    NavigationAssist,
}

impl InterventionType {
    pub const ALL: [InterventionType; 6] = [
        Self::SpacedRepetition,
        Self::ContextualAnchoring,
        Self::MultimediaReinforcement,
        Self::EmotionalPreservation,
        Self::RoutineReminder,
        Self::NavigationAssist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SpacedRepetition => "spaced_repetition",
            Self::ContextualAnchoring => "contextual_anchoring",
            Self::MultimediaReinforcement => "multimedia_reinforcement",
            Self::EmotionalPreservation => "emotional_preservation",
            Self::RoutineReminder => "routine_reminder",
            Self::NavigationAssist => "navigation_assist",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for InterventionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intervention lifecycle.
///
/// ```text
/// scheduled ─┬─> delivered ─┬─> completed
///            │              ├─> failed
///            │              └─> skipped
///            ├─> skipped
///            └─> failed
/// ```
/// Nothing ever returns to `scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionStatus {
    Scheduled,
    Delivered,
    Completed,
    Skipped,
    Failed,
}

impl InterventionStatus {
    pub const ALL: [InterventionStatus; 5] = [
        Self::Scheduled,
        Self::Delivered,
        Self::Completed,
        Self::Skipped,
        Self::Failed,
    ];

    /// `scheduled` or `delivered`.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Scheduled | Self::Delivered)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }

    pub fn can_transition_to(self, next: InterventionStatus) -> bool {
        use InterventionStatus::*;
        matches!(
            (self, next),
            (Scheduled, Delivered)
                | (Scheduled, Skipped)
                | (Scheduled, Failed)
                | (Delivered, Completed)
                | (Delivered, Skipped)
                | (Delivered, Failed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for InterventionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signal that caused an intervention to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterventionTrigger {
    Decay {
        memory_id: String,
        probability: f64,
    },
    Assessment {
        score_id: String,
        tier: RiskTier,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        indicator: Option<String>,
    },
}

/// Caller actions on an existing intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionAction {
    Complete,
    Skip,
    Cancel,
}

impl InterventionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Skip => "skip",
            Self::Cancel => "cancel",
        }
    }

    /// The status this action moves an intervention into.
    pub fn target_status(self) -> InterventionStatus {
        match self {
            Self::Complete => InterventionStatus::Completed,
            Self::Skip | Self::Cancel => InterventionStatus::Skipped,
        }
    }
}

/// What happened when the subject worked through a delivered intervention.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InterventionOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recall_before: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recall_after: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A scheduled memory-preservation or caregiver-support activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub id: String,
    pub subject_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_id: Option<String>,
    pub intervention_type: InterventionType,
    pub trigger: InterventionTrigger,
    pub title: String,
    /// Neighbor memories used as contextual cues.
    #[serde(default)]
    pub anchors: Vec<String>,
    pub scheduled_for: DateTime<Utc>,
    pub status: InterventionStatus,
    /// Failed dispatch attempts so far.
    pub delivery_failures: u32,
    /// Earliest time the next dispatch attempt may run, after a failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_attempt_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<InterventionOutcome>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Intervention {
    pub fn new(
        subject_id: impl Into<String>,
        intervention_type: InterventionType,
        trigger: InterventionTrigger,
        title: impl Into<String>,
        scheduled_for: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        let memory_id = match &trigger {
            InterventionTrigger::Decay { memory_id, .. } => Some(memory_id.clone()),
            InterventionTrigger::Assessment { .. } => None,
        };
        Self {
            id: super::new_id(),
            subject_id: subject_id.into(),
            memory_id,
            intervention_type,
            trigger,
            title: title.into(),
            anchors: Vec::new(),
            scheduled_for,
            status: InterventionStatus::Scheduled,
            delivery_failures: 0,
            next_attempt_at: None,
            delivered_at: None,
            resolved_at: None,
            cancelled: false,
            outcome: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Scheduled, past its time, and not waiting out a retry backoff.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == InterventionStatus::Scheduled
            && self.scheduled_for <= now
            && self.next_attempt_at.map_or(true, |at| at <= now)
    }

    /// Move to `next`, rejecting anything the lifecycle forbids.
    pub fn transition(&mut self, next: InterventionStatus, now: DateTime<Utc>) -> VigilResult<()> {
        self.apply(next, &format!("move to {next}"), now)
    }

    /// Same as [`transition`](Self::transition) but reports `attempted` in the error.
    pub fn apply(
        &mut self,
        next: InterventionStatus,
        attempted: &str,
        now: DateTime<Utc>,
    ) -> VigilResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(VigilError::InvalidTransition {
                intervention_id: self.id.clone(),
                current: self.status,
                attempted: attempted.to_string(),
            });
        }
        self.status = next;
        self.updated_at = now;
        match next {
            InterventionStatus::Delivered => {
                self.delivered_at = Some(now);
                self.next_attempt_at = None;
            }
            InterventionStatus::Completed
            | InterventionStatus::Skipped
            | InterventionStatus::Failed => self.resolved_at = Some(now),
            InterventionStatus::Scheduled => {}
        }
        Ok(())
    }
}
