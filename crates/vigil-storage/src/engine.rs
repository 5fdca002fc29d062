//! StorageEngine: owns the connection pool and implements `IVigilStorage`.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use vigil_core::config::StorageConfig;
use vigil_core::errors::VigilResult;
use vigil_core::models::{
    Assessment, Intervention, InterventionStatus, MemoryEntity, MemoryRelation, ScoreResult,
    Subject,
};
use vigil_core::traits::{IVigilStorage, ScoreCommit};

use crate::migrations;
use crate::pool::{pragmas, ConnectionPool, DEFAULT_READ_POOL_SIZE};
use crate::queries::{intervention_ops, memory_ops, score_ops, subject_ops};
use crate::to_storage_err;

pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    /// Open (creating if needed) a database file and bring its schema up to date.
    pub fn open(path: &Path) -> VigilResult<Self> {
        Self::open_with_config(path, &StorageConfig::default())
    }

    pub fn open_with_config(path: &Path, config: &StorageConfig) -> VigilResult<Self> {
        let pool = ConnectionPool::open(path, DEFAULT_READ_POOL_SIZE, config.busy_timeout_ms)?;
        let engine = Self { pool };
        engine.initialize()?;
        debug!(path = %path.display(), "storage opened");
        Ok(engine)
    }

    /// In-memory database. All reads go through the writer.
    pub fn open_in_memory() -> VigilResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open_in_memory()?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> VigilResult<()> {
        let version = self.pool.writer.with_conn(migrations::run_migrations)?;
        debug!(version, "schema ready");
        Ok(())
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn schema_version(&self) -> VigilResult<u32> {
        self.pool.writer.with_conn(migrations::current_version)
    }

    /// True when the writer runs in WAL mode. Always false in memory.
    pub fn is_wal(&self) -> VigilResult<bool> {
        self.pool.writer.with_conn(pragmas::verify_wal_mode)
    }

    pub fn get_intervention(&self, id: &str) -> VigilResult<Option<Intervention>> {
        self.with_reader(|conn| intervention_ops::get_intervention(conn, id))
    }

    fn with_reader<F, T>(&self, f: F) -> VigilResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> VigilResult<T>,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn(f),
        }
    }
}

impl IVigilStorage for StorageEngine {
    fn upsert_subject(&self, subject: &Subject) -> VigilResult<()> {
        self.pool
            .writer
            .with_conn(|conn| subject_ops::upsert_subject(conn, subject))
    }

    fn get_subject(&self, id: &str) -> VigilResult<Option<Subject>> {
        self.with_reader(|conn| subject_ops::get_subject(conn, id))
    }

    fn list_subjects(&self) -> VigilResult<Vec<Subject>> {
        self.with_reader(subject_ops::list_subjects)
    }

    fn commit_score(&self, commit: ScoreCommit<'_>) -> VigilResult<()> {
        self.pool.writer.with_conn(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| to_storage_err(e.to_string()))?;
            if let Some(assessment) = commit.assessment {
                score_ops::insert_assessment(&tx, assessment)?;
            }
            if let Some(signals) = commit.signals {
                score_ops::insert_signal_set(&tx, signals)?;
            }
            score_ops::insert_score(&tx, commit.score)?;
            for intervention in commit.interventions {
                intervention_ops::upsert_intervention(&tx, intervention)?;
            }
            tx.commit().map_err(|e| to_storage_err(e.to_string()))?;
            Ok(())
        })
    }

    fn get_assessment(&self, id: &str) -> VigilResult<Option<Assessment>> {
        self.with_reader(|conn| score_ops::get_assessment(conn, id))
    }

    fn score_results(
        &self,
        subject_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> VigilResult<Vec<ScoreResult>> {
        self.with_reader(|conn| score_ops::score_results_between(conn, subject_id, from, to))
    }

    fn upsert_memory(&self, entity: &MemoryEntity) -> VigilResult<()> {
        self.pool
            .writer
            .with_conn(|conn| memory_ops::upsert_memory(conn, entity))
    }

    fn list_memories(&self, subject_id: &str) -> VigilResult<Vec<MemoryEntity>> {
        self.with_reader(|conn| memory_ops::list_memories(conn, subject_id))
    }

    fn upsert_relation(&self, relation: &MemoryRelation) -> VigilResult<()> {
        self.pool
            .writer
            .with_conn(|conn| memory_ops::upsert_relation(conn, relation))
    }

    fn list_relations(&self, subject_id: &str) -> VigilResult<Vec<MemoryRelation>> {
        self.with_reader(|conn| memory_ops::list_relations(conn, subject_id))
    }

    fn upsert_interventions(&self, interventions: &[Intervention]) -> VigilResult<()> {
        if interventions.is_empty() {
            return Ok(());
        }
        self.pool.writer.with_conn(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| to_storage_err(e.to_string()))?;
            for intervention in interventions {
                intervention_ops::upsert_intervention(&tx, intervention)?;
            }
            tx.commit().map_err(|e| to_storage_err(e.to_string()))?;
            Ok(())
        })
    }

    fn list_interventions(
        &self,
        subject_id: &str,
        status: Option<InterventionStatus>,
    ) -> VigilResult<Vec<Intervention>> {
        self.with_reader(|conn| intervention_ops::list_interventions(conn, subject_id, status))
    }
}
