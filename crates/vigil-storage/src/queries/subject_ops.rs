//! Subject enrollment and deactivation.

use rusqlite::{params, Connection, OptionalExtension, Row};

use vigil_core::errors::VigilResult;
use vigil_core::models::{Subject, SubjectKind};

use super::{fmt_opt_ts, fmt_ts, parse_enum, parse_opt_ts, parse_ts};
use crate::to_storage_err;

const TABLE: &str = "subjects";

const COLUMNS: &str = "id, kind, display_name, active, enrolled_at, deactivated_at";

struct SubjectRow {
    id: String,
    kind: String,
    display_name: String,
    active: bool,
    enrolled_at: String,
    deactivated_at: Option<String>,
}

impl SubjectRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            display_name: row.get(2)?,
            active: row.get(3)?,
            enrolled_at: row.get(4)?,
            deactivated_at: row.get(5)?,
        })
    }

    fn decode(self) -> VigilResult<Subject> {
        Ok(Subject {
            kind: parse_enum(TABLE, "kind", &self.kind, SubjectKind::from_str_name)?,
            enrolled_at: parse_ts(TABLE, &self.enrolled_at)?,
            deactivated_at: parse_opt_ts(TABLE, self.deactivated_at)?,
            id: self.id,
            display_name: self.display_name,
            active: self.active,
        })
    }
}

/// Insert, or update the mutable fields of, a subject. Kind and enrollment
/// time never change once written.
pub fn upsert_subject(conn: &Connection, subject: &Subject) -> VigilResult<()> {
    conn.execute(
        "INSERT INTO subjects (id, kind, display_name, active, enrolled_at, deactivated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            display_name = excluded.display_name,
            active = excluded.active,
            deactivated_at = excluded.deactivated_at",
        params![
            subject.id,
            subject.kind.as_str(),
            subject.display_name,
            subject.active,
            fmt_ts(&subject.enrolled_at),
            fmt_opt_ts(subject.deactivated_at.as_ref()),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_subject(conn: &Connection, id: &str) -> VigilResult<Option<Subject>> {
    let row = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM subjects WHERE id = ?1"),
            params![id],
            SubjectRow::read,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.map(SubjectRow::decode).transpose()
}

/// Every subject, in enrollment order.
pub fn list_subjects(conn: &Connection) -> VigilResult<Vec<Subject>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM subjects ORDER BY enrolled_at ASC, id ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], SubjectRow::read)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut subjects = Vec::new();
    for row in rows {
        let row = row.map_err(|e| to_storage_err(e.to_string()))?;
        subjects.push(row.decode()?);
    }
    Ok(subjects)
}
