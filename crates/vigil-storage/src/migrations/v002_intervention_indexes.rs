//! v002: status lookups for the sweep and hydration.

use rusqlite::Connection;

use vigil_core::errors::VigilResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> VigilResult<()> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_interventions_status
            ON interventions(status, scheduled_for);
        CREATE INDEX IF NOT EXISTS idx_interventions_subject_type
            ON interventions(subject_id, intervention_type, status);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
