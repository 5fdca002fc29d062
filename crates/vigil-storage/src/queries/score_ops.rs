//! Assessments, signal sets, and the score results computed from them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use vigil_core::errors::VigilResult;
use vigil_core::models::{
    Assessment, Recommendation, RiskTier, ScoreResult, ScoreSource, SignalSet, Urgency,
};

use super::{fmt_ts, parse_enum, parse_ts};
use crate::{corrupt_row, to_storage_err};

/// Assessments are immutable: a second insert with the same id fails.
pub fn insert_assessment(conn: &Connection, assessment: &Assessment) -> VigilResult<()> {
    let responses = serde_json::to_string(&assessment.responses)?;
    conn.execute(
        "INSERT INTO assessments (id, subject_id, responses, submitted_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            assessment.id,
            assessment.subject_id,
            responses,
            fmt_ts(&assessment.submitted_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_assessment(conn: &Connection, id: &str) -> VigilResult<Option<Assessment>> {
    let row = conn
        .query_row(
            "SELECT id, subject_id, responses, submitted_at FROM assessments WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((id, subject_id, responses_json, submitted_at)) = row else {
        return Ok(None);
    };
    let responses: BTreeMap<String, u8> = serde_json::from_str(&responses_json)
        .map_err(|e| corrupt_row("assessments", format!("responses: {e}")))?;
    Ok(Some(Assessment {
        id,
        subject_id,
        responses,
        submitted_at: parse_ts("assessments", &submitted_at)?,
    }))
}

pub fn insert_signal_set(conn: &Connection, signals: &SignalSet) -> VigilResult<()> {
    let features = serde_json::to_string(&signals.features)?;
    conn.execute(
        "INSERT INTO signal_sets (id, subject_id, features, observed_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            signals.id,
            signals.subject_id,
            features,
            fmt_ts(&signals.observed_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn insert_score(conn: &Connection, score: &ScoreResult) -> VigilResult<()> {
    let model = match &score.source {
        ScoreSource::Signals { model, .. } => Some(model.as_str()),
        ScoreSource::Assessment { .. } => None,
    };
    let sub_scores = serde_json::to_string(&score.sub_scores)?;
    let recommendations = serde_json::to_string(&score.recommendations)?;
    conn.execute(
        "INSERT INTO score_results
            (id, subject_id, source_kind, source_id, model, composite,
             sub_scores, tier, urgency, recommendations, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            score.id,
            score.subject_id,
            score.source.kind(),
            score.source.source_id(),
            model,
            score.composite,
            sub_scores,
            score.tier.as_str(),
            score.urgency.as_str(),
            recommendations,
            fmt_ts(&score.created_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

struct ScoreRow {
    id: String,
    subject_id: String,
    source_kind: String,
    source_id: String,
    model: Option<String>,
    composite: f64,
    sub_scores: String,
    tier: String,
    urgency: String,
    recommendations: String,
    created_at: String,
}

impl ScoreRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            subject_id: row.get(1)?,
            source_kind: row.get(2)?,
            source_id: row.get(3)?,
            model: row.get(4)?,
            composite: row.get(5)?,
            sub_scores: row.get(6)?,
            tier: row.get(7)?,
            urgency: row.get(8)?,
            recommendations: row.get(9)?,
            created_at: row.get(10)?,
        })
    }

    fn decode(self) -> VigilResult<ScoreResult> {
        const TABLE: &str = "score_results";
        let source = match (self.source_kind.as_str(), self.model) {
            ("assessment", _) => ScoreSource::Assessment {
                assessment_id: self.source_id,
            },
            ("signals", Some(model)) => ScoreSource::Signals {
                signal_set_id: self.source_id,
                model,
            },
            (kind, _) => return Err(corrupt_row(TABLE, format!("unknown source {kind:?}"))),
        };
        let sub_scores: BTreeMap<String, f64> = serde_json::from_str(&self.sub_scores)
            .map_err(|e| corrupt_row(TABLE, format!("sub_scores: {e}")))?;
        let recommendations: Vec<Recommendation> = serde_json::from_str(&self.recommendations)
            .map_err(|e| corrupt_row(TABLE, format!("recommendations: {e}")))?;
        Ok(ScoreResult {
            id: self.id,
            subject_id: self.subject_id,
            source,
            composite: self.composite,
            sub_scores,
            tier: parse_enum(TABLE, "tier", &self.tier, RiskTier::from_str_name)?,
            urgency: parse_enum(TABLE, "urgency", &self.urgency, Urgency::from_str_name)?,
            recommendations,
            created_at: parse_ts(TABLE, &self.created_at)?,
        })
    }
}

/// Score results for one subject with `from <= created_at <= to`, oldest first.
pub fn score_results_between(
    conn: &Connection,
    subject_id: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> VigilResult<Vec<ScoreResult>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, subject_id, source_kind, source_id, model, composite,
                    sub_scores, tier, urgency, recommendations, created_at
             FROM score_results
             WHERE subject_id = ?1 AND created_at >= ?2 AND created_at <= ?3
             ORDER BY created_at ASC, id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![subject_id, fmt_ts(&from), fmt_ts(&to)], ScoreRow::read)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        let row = row.map_err(|e| to_storage_err(e.to_string()))?;
        results.push(row.decode()?);
    }
    Ok(results)
}
