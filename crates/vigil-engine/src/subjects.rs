//! Subject lifecycle: enroll, deactivate, look up. Subjects are never deleted.

use tracing::info;

use vigil_core::errors::{GraphError, RecordKind, VigilError, VigilResult};
use vigil_core::models::{Subject, SubjectKind};

use crate::engine::VigilEngine;

impl VigilEngine {
    /// Enroll a new subject. Patients get an empty memory graph.
    pub fn enroll_subject(&self, kind: SubjectKind, display_name: &str) -> VigilResult<Subject> {
        let subject = Subject::enroll(kind, display_name, self.clock.now());
        self.storage.upsert_subject(&subject)?;
        if subject.has_memory_graph() {
            self.graphs.open(&subject.id);
        }
        self.subjects.insert(subject.id.clone(), subject.clone());
        info!(subject_id = %subject.id, kind = %kind.as_str(), "subject enrolled");
        Ok(subject)
    }

    /// Stop accepting assessments and memory mutations for a subject.
    /// Existing interventions keep their lifecycle. Deactivating twice is a no-op.
    pub fn deactivate_subject(&self, subject_id: &str) -> VigilResult<Subject> {
        let mut entry = self
            .subjects
            .get_mut(subject_id)
            .ok_or_else(|| VigilError::not_found(RecordKind::Subject, subject_id))?;
        if !entry.active {
            return Ok(entry.value().clone());
        }
        let mut updated = entry.value().clone();
        updated.active = false;
        updated.deactivated_at = Some(self.clock.now());
        self.storage.upsert_subject(&updated)?;
        *entry = updated.clone();
        info!(subject_id = %subject_id, "subject deactivated");
        Ok(updated)
    }

    pub fn get_subject(&self, subject_id: &str) -> VigilResult<Subject> {
        self.subjects
            .get(subject_id)
            .map(|s| s.value().clone())
            .ok_or_else(|| VigilError::not_found(RecordKind::Subject, subject_id))
    }

    /// All subjects, earliest enrollment first.
    pub fn list_subjects(&self) -> Vec<Subject> {
        let mut out: Vec<Subject> = self.subjects.iter().map(|s| s.value().clone()).collect();
        out.sort_by(|a, b| a.enrolled_at.cmp(&b.enrolled_at).then_with(|| a.id.cmp(&b.id)));
        out
    }

    /// The subject, if it exists and is still active.
    pub(crate) fn active_subject(&self, subject_id: &str) -> VigilResult<Subject> {
        let subject = self.get_subject(subject_id)?;
        if !subject.active {
            return Err(VigilError::SubjectInactive {
                id: subject_id.to_string(),
            });
        }
        Ok(subject)
    }

    /// The subject, if it exists and owns a memory graph.
    pub(crate) fn graph_owner(&self, subject_id: &str) -> VigilResult<Subject> {
        let subject = self.get_subject(subject_id)?;
        if !subject.has_memory_graph() {
            return Err(GraphError::NoGraphForSubject {
                subject_id: subject_id.to_string(),
            }
            .into());
        }
        Ok(subject)
    }

    /// [`graph_owner`](Self::graph_owner) that also rejects deactivated subjects.
    pub(crate) fn active_graph_owner(&self, subject_id: &str) -> VigilResult<Subject> {
        let subject = self.graph_owner(subject_id)?;
        if !subject.active {
            return Err(VigilError::SubjectInactive {
                id: subject_id.to_string(),
            });
        }
        Ok(subject)
    }
}
