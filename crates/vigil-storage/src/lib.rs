//! # vigil-storage
//!
//! SQLite persistence for every subject-scoped record.
//! One serialized write connection, a small read pool for file-backed
//! databases, forward-only migrations, and one query module per table group.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use vigil_core::errors::{StorageError, VigilError};

/// Wrap a SQLite failure message as a storage error.
pub(crate) fn to_storage_err(message: String) -> VigilError {
    VigilError::Storage(StorageError::SqliteError { message })
}

/// A row that could be read but not decoded.
pub(crate) fn corrupt_row(table: &str, details: impl Into<String>) -> VigilError {
    VigilError::Storage(StorageError::CorruptRow {
        table: table.to_string(),
        details: details.into(),
    })
}
