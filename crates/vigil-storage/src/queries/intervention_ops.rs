//! Intervention upserts and listings.

use rusqlite::{params, Connection, OptionalExtension, Row};

use vigil_core::errors::VigilResult;
use vigil_core::models::{
    Intervention, InterventionOutcome, InterventionStatus, InterventionTrigger, InterventionType,
};

use super::{fmt_opt_ts, fmt_ts, parse_enum, parse_opt_ts, parse_ts};
use crate::{corrupt_row, to_storage_err};

const TABLE: &str = "interventions";

const COLUMNS: &str = "id, subject_id, memory_id, intervention_type, triggered_by, title, anchors,
    scheduled_for, status, delivery_failures, next_attempt_at, delivered_at, resolved_at,
    cancelled, outcome, created_at, updated_at";

/// Insert or fully overwrite one intervention. Owner and type never change.
pub fn upsert_intervention(conn: &Connection, intervention: &Intervention) -> VigilResult<()> {
    let trigger = serde_json::to_string(&intervention.trigger)?;
    let anchors = serde_json::to_string(&intervention.anchors)?;
    let outcome = intervention
        .outcome
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    conn.execute(
        &format!(
            "INSERT INTO interventions ({COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
             ON CONFLICT(id) DO UPDATE SET
                memory_id = excluded.memory_id,
                triggered_by = excluded.triggered_by,
                title = excluded.title,
                anchors = excluded.anchors,
                scheduled_for = excluded.scheduled_for,
                status = excluded.status,
                delivery_failures = excluded.delivery_failures,
                next_attempt_at = excluded.next_attempt_at,
                delivered_at = excluded.delivered_at,
                resolved_at = excluded.resolved_at,
                cancelled = excluded.cancelled,
                outcome = excluded.outcome,
                updated_at = excluded.updated_at"
        ),
        params![
            intervention.id,
            intervention.subject_id,
            intervention.memory_id,
            intervention.intervention_type.as_str(),
            trigger,
            intervention.title,
            anchors,
            fmt_ts(&intervention.scheduled_for),
            intervention.status.as_str(),
            intervention.delivery_failures,
            fmt_opt_ts(intervention.next_attempt_at.as_ref()),
            fmt_opt_ts(intervention.delivered_at.as_ref()),
            fmt_opt_ts(intervention.resolved_at.as_ref()),
            intervention.cancelled,
            outcome,
            fmt_ts(&intervention.created_at),
            fmt_ts(&intervention.updated_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

struct InterventionRow {
    id: String,
    subject_id: String,
    memory_id: Option<String>,
    intervention_type: String,
    trigger: String,
    title: String,
    anchors: String,
    scheduled_for: String,
    status: String,
    delivery_failures: u32,
    next_attempt_at: Option<String>,
    delivered_at: Option<String>,
    resolved_at: Option<String>,
    cancelled: bool,
    outcome: Option<String>,
    created_at: String,
    updated_at: String,
}

impl InterventionRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            subject_id: row.get(1)?,
            memory_id: row.get(2)?,
            intervention_type: row.get(3)?,
            trigger: row.get(4)?,
            title: row.get(5)?,
            anchors: row.get(6)?,
            scheduled_for: row.get(7)?,
            status: row.get(8)?,
            delivery_failures: row.get(9)?,
            next_attempt_at: row.get(10)?,
            delivered_at: row.get(11)?,
            resolved_at: row.get(12)?,
            cancelled: row.get(13)?,
            outcome: row.get(14)?,
            created_at: row.get(15)?,
            updated_at: row.get(16)?,
        })
    }

    fn decode(self) -> VigilResult<Intervention> {
        let trigger: InterventionTrigger = serde_json::from_str(&self.trigger)
            .map_err(|e| corrupt_row(TABLE, format!("trigger: {e}")))?;
        let anchors: Vec<String> = serde_json::from_str(&self.anchors)
            .map_err(|e| corrupt_row(TABLE, format!("anchors: {e}")))?;
        let outcome: Option<InterventionOutcome> = self
            .outcome
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| corrupt_row(TABLE, format!("outcome: {e}")))?;
        Ok(Intervention {
            intervention_type: parse_enum(
                TABLE,
                "intervention_type",
                &self.intervention_type,
                InterventionType::from_str_name,
            )?,
            status: parse_enum(TABLE, "status", &self.status, InterventionStatus::from_str_name)?,
            scheduled_for: parse_ts(TABLE, &self.scheduled_for)?,
            next_attempt_at: parse_opt_ts(TABLE, self.next_attempt_at)?,
            delivered_at: parse_opt_ts(TABLE, self.delivered_at)?,
            resolved_at: parse_opt_ts(TABLE, self.resolved_at)?,
            created_at: parse_ts(TABLE, &self.created_at)?,
            updated_at: parse_ts(TABLE, &self.updated_at)?,
            id: self.id,
            subject_id: self.subject_id,
            memory_id: self.memory_id,
            trigger,
            title: self.title,
            anchors,
            delivery_failures: self.delivery_failures,
            cancelled: self.cancelled,
            outcome,
        })
    }
}

pub fn get_intervention(conn: &Connection, id: &str) -> VigilResult<Option<Intervention>> {
    let row = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM interventions WHERE id = ?1"),
            params![id],
            InterventionRow::read,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.map(InterventionRow::decode).transpose()
}

/// A subject's interventions, most recent `scheduled_for` first, ties broken
/// by most recent creation.
pub fn list_interventions(
    conn: &Connection,
    subject_id: &str,
    status: Option<InterventionStatus>,
) -> VigilResult<Vec<Intervention>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM interventions
             WHERE subject_id = ?1 AND (?2 IS NULL OR status = ?2)
             ORDER BY scheduled_for DESC, created_at DESC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(
            params![subject_id, status.map(InterventionStatus::as_str)],
            InterventionRow::read,
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut interventions = Vec::new();
    for row in rows {
        let row = row.map_err(|e| to_storage_err(e.to_string()))?;
        interventions.push(row.decode()?);
    }
    Ok(interventions)
}
