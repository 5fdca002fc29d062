//! v001: subjects, assessments, signal_sets, score_results, memory_entities,
//! memory_relations, interventions.

use rusqlite::Connection;

use vigil_core::errors::VigilResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> VigilResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS subjects (
            id              TEXT PRIMARY KEY,
            kind            TEXT NOT NULL,
            display_name    TEXT NOT NULL DEFAULT '',
            active          INTEGER NOT NULL DEFAULT 1,
            enrolled_at     TEXT NOT NULL,
            deactivated_at  TEXT,
            created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS assessments (
            id            TEXT PRIMARY KEY,
            subject_id    TEXT NOT NULL REFERENCES subjects(id),
            responses     TEXT NOT NULL,
            submitted_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_assessments_subject
            ON assessments(subject_id, submitted_at);

        CREATE TABLE IF NOT EXISTS signal_sets (
            id           TEXT PRIMARY KEY,
            subject_id   TEXT NOT NULL REFERENCES subjects(id),
            features     TEXT NOT NULL,
            observed_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_signal_sets_subject
            ON signal_sets(subject_id, observed_at);

        CREATE TABLE IF NOT EXISTS score_results (
            id               TEXT PRIMARY KEY,
            subject_id       TEXT NOT NULL REFERENCES subjects(id),
            source_kind      TEXT NOT NULL,
            source_id        TEXT NOT NULL,
            model            TEXT,
            composite        REAL NOT NULL,
            sub_scores       TEXT NOT NULL DEFAULT '{}',
            tier             TEXT NOT NULL,
            urgency          TEXT NOT NULL,
            recommendations  TEXT NOT NULL DEFAULT '[]',
            created_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_score_results_subject
            ON score_results(subject_id, created_at);

        CREATE TABLE IF NOT EXISTS memory_entities (
            id                TEXT PRIMARY KEY,
            subject_id        TEXT NOT NULL REFERENCES subjects(id),
            memory_type       TEXT NOT NULL,
            name              TEXT NOT NULL,
            description       TEXT,
            recall_strength   REAL NOT NULL,
            emotional_weight  REAL NOT NULL,
            importance        REAL NOT NULL,
            last_accessed     TEXT NOT NULL,
            access_count      INTEGER NOT NULL DEFAULT 0,
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_memory_entities_subject
            ON memory_entities(subject_id);

        CREATE TABLE IF NOT EXISTS memory_relations (
            id             TEXT PRIMARY KEY,
            subject_id     TEXT NOT NULL REFERENCES subjects(id),
            source_id      TEXT NOT NULL REFERENCES memory_entities(id),
            target_id      TEXT NOT NULL REFERENCES memory_entities(id),
            relation_type  TEXT NOT NULL,
            weight         REAL NOT NULL,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL,
            CHECK (source_id <> target_id),
            UNIQUE (source_id, target_id, relation_type)
        );

        CREATE INDEX IF NOT EXISTS idx_memory_relations_subject
            ON memory_relations(subject_id);

        CREATE TABLE IF NOT EXISTS interventions (
            id                 TEXT PRIMARY KEY,
            subject_id         TEXT NOT NULL REFERENCES subjects(id),
            memory_id          TEXT,
            intervention_type  TEXT NOT NULL,
            triggered_by       TEXT NOT NULL,
            title              TEXT NOT NULL,
            anchors            TEXT NOT NULL DEFAULT '[]',
            scheduled_for      TEXT NOT NULL,
            status             TEXT NOT NULL DEFAULT 'scheduled',
            delivery_failures  INTEGER NOT NULL DEFAULT 0,
            next_attempt_at    TEXT,
            delivered_at       TEXT,
            resolved_at        TEXT,
            cancelled          INTEGER NOT NULL DEFAULT 0,
            outcome            TEXT,
            created_at         TEXT NOT NULL,
            updated_at         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_interventions_subject
            ON interventions(subject_id, scheduled_for);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
