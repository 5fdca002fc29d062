//! Memory entities and the relations between them.

use rusqlite::{params, Connection, Row};

use vigil_core::errors::VigilResult;
use vigil_core::models::{MemoryEntity, MemoryRelation, MemoryType, RelationType};

use super::{fmt_ts, parse_enum, parse_ts};
use crate::to_storage_err;

pub fn upsert_memory(conn: &Connection, entity: &MemoryEntity) -> VigilResult<()> {
    conn.execute(
        "INSERT INTO memory_entities
            (id, subject_id, memory_type, name, description, recall_strength,
             emotional_weight, importance, last_accessed, access_count, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
         ON CONFLICT(id) DO UPDATE SET
            memory_type = excluded.memory_type,
            name = excluded.name,
            description = excluded.description,
            recall_strength = excluded.recall_strength,
            emotional_weight = excluded.emotional_weight,
            importance = excluded.importance,
            last_accessed = excluded.last_accessed,
            access_count = excluded.access_count,
            updated_at = excluded.updated_at",
        params![
            entity.id,
            entity.subject_id,
            entity.memory_type.as_str(),
            entity.name,
            entity.description,
            entity.recall_strength,
            entity.emotional_weight,
            entity.importance,
            fmt_ts(&entity.last_accessed),
            i64::try_from(entity.access_count).unwrap_or(i64::MAX),
            fmt_ts(&entity.created_at),
            fmt_ts(&entity.updated_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

struct EntityRow {
    id: String,
    subject_id: String,
    memory_type: String,
    name: String,
    description: Option<String>,
    recall_strength: f64,
    emotional_weight: f64,
    importance: f64,
    last_accessed: String,
    access_count: i64,
    created_at: String,
    updated_at: String,
}

impl EntityRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            subject_id: row.get(1)?,
            memory_type: row.get(2)?,
            name: row.get(3)?,
            description: row.get(4)?,
            recall_strength: row.get(5)?,
            emotional_weight: row.get(6)?,
            importance: row.get(7)?,
            last_accessed: row.get(8)?,
            access_count: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn decode(self) -> VigilResult<MemoryEntity> {
        const TABLE: &str = "memory_entities";
        Ok(MemoryEntity {
            memory_type: parse_enum(TABLE, "memory_type", &self.memory_type, MemoryType::from_str_name)?,
            last_accessed: parse_ts(TABLE, &self.last_accessed)?,
            created_at: parse_ts(TABLE, &self.created_at)?,
            updated_at: parse_ts(TABLE, &self.updated_at)?,
            access_count: u64::try_from(self.access_count).unwrap_or(0),
            id: self.id,
            subject_id: self.subject_id,
            name: self.name,
            description: self.description,
            recall_strength: self.recall_strength,
            emotional_weight: self.emotional_weight,
            importance: self.importance,
        })
    }
}

/// All of a subject's memories, oldest first.
pub fn list_memories(conn: &Connection, subject_id: &str) -> VigilResult<Vec<MemoryEntity>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, subject_id, memory_type, name, description, recall_strength,
                    emotional_weight, importance, last_accessed, access_count,
                    created_at, updated_at
             FROM memory_entities
             WHERE subject_id = ?1
             ORDER BY created_at ASC, id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![subject_id], EntityRow::read)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entities = Vec::new();
    for row in rows {
        let row = row.map_err(|e| to_storage_err(e.to_string()))?;
        entities.push(row.decode()?);
    }
    Ok(entities)
}

pub fn upsert_relation(conn: &Connection, relation: &MemoryRelation) -> VigilResult<()> {
    conn.execute(
        "INSERT INTO memory_relations
            (id, subject_id, source_id, target_id, relation_type, weight, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
            weight = excluded.weight,
            updated_at = excluded.updated_at",
        params![
            relation.id,
            relation.subject_id,
            relation.source_id,
            relation.target_id,
            relation.relation_type.as_str(),
            relation.weight,
            fmt_ts(&relation.created_at),
            fmt_ts(&relation.updated_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn list_relations(conn: &Connection, subject_id: &str) -> VigilResult<Vec<MemoryRelation>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, subject_id, source_id, target_id, relation_type, weight,
                    created_at, updated_at
             FROM memory_relations
             WHERE subject_id = ?1
             ORDER BY created_at ASC, id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![subject_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    const TABLE: &str = "memory_relations";
    let mut relations = Vec::new();
    for row in rows {
        let (id, subject_id, source_id, target_id, relation_type, weight, created_at, updated_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        relations.push(MemoryRelation {
            id,
            subject_id,
            source_id,
            target_id,
            relation_type: parse_enum(
                TABLE,
                "relation_type",
                &relation_type,
                RelationType::from_str_name,
            )?,
            weight,
            created_at: parse_ts(TABLE, &created_at)?,
            updated_at: parse_ts(TABLE, &updated_at)?,
        });
    }
    Ok(relations)
}
