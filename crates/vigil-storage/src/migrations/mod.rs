//! Forward-only schema migrations, tracked in `schema_version`.

mod v001_initial_schema;
mod v002_intervention_indexes;

use rusqlite::{params, Connection};
use tracing::info;

use vigil_core::errors::{StorageError, VigilError, VigilResult};

use crate::to_storage_err;

type Migration = fn(&Connection) -> VigilResult<()>;

const MIGRATIONS: [(u32, Migration); 2] = [
    (1, v001_initial_schema::migrate),
    (2, v002_intervention_indexes::migrate),
];

/// Highest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Highest applied version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> VigilResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Apply every pending migration, each in its own transaction.
/// Returns the resulting schema version.
pub fn run_migrations(conn: &Connection) -> VigilResult<u32> {
    let current = current_version(conn)?;
    for (version, migrate) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let failed = |reason: String| {
            VigilError::Storage(StorageError::MigrationFailed {
                version: *version,
                reason,
            })
        };
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| failed(e.to_string()))?;
        migrate(&tx).map_err(|e| failed(e.to_string()))?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![version],
        )
        .map_err(|e| failed(e.to_string()))?;
        tx.commit().map_err(|e| failed(e.to_string()))?;
        info!(version, "applied schema migration");
    }
    Ok(current.max(LATEST_VERSION))
}
