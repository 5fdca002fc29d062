//! Per-table query modules. All take a borrowed connection so they compose
//! inside a caller's transaction.

pub mod intervention_ops;
pub mod memory_ops;
pub mod score_ops;
pub mod subject_ops;

use chrono::{DateTime, SecondsFormat, Utc};

use vigil_core::errors::VigilResult;

use crate::corrupt_row;

/// Fixed-width RFC 3339 with nanoseconds, so text order is time order.
pub(crate) fn fmt_ts(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn fmt_opt_ts(at: Option<&DateTime<Utc>>) -> Option<String> {
    at.map(fmt_ts)
}

pub(crate) fn parse_ts(table: &str, raw: &str) -> VigilResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| corrupt_row(table, format!("bad timestamp {raw:?}: {e}")))
}

pub(crate) fn parse_opt_ts(table: &str, raw: Option<String>) -> VigilResult<Option<DateTime<Utc>>> {
    raw.map(|s| parse_ts(table, &s)).transpose()
}

/// Decode a closed-enum column via its `from_str_name`.
pub(crate) fn parse_enum<T>(
    table: &str,
    column: &str,
    raw: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> VigilResult<T> {
    parse(raw).ok_or_else(|| corrupt_row(table, format!("unknown {column} {raw:?}")))
}
