//! Error type for the data access helper.
//!
//! Every failure is returned as a `DbError`; "not found" is never an error
//! and shows up as `Ok(None)` or an empty row set instead.
//!
//! CHANGELOG:
//! - 10/18/2026 - Replaced false/0 sentinels with DbError variants

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by `SqlHelper` and the query builder.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to open database at {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Query failed: {sql} (params: {params}): {source}")]
    Query {
        sql: String,
        params: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Script execution failed: {0}")]
    Script(#[source] rusqlite::Error),

    #[error("Transaction failed: {0}")]
    Transaction(#[source] rusqlite::Error),

    #[error("Expected {expected} parameters, got {got}")]
    ParamCount { expected: usize, got: usize },

    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Column list is empty")]
    EmptyColumns,
}

impl DbError {
    /// True when the underlying SQLite error is a constraint violation
    /// (UNIQUE, FOREIGN KEY, NOT NULL, CHECK).
    pub fn is_constraint_violation(&self) -> bool {
        let source = match self {
            DbError::Query { source, .. } => source,
            DbError::Script(source) | DbError::Transaction(source) => source,
            _ => return false,
        };
        matches!(
            source.sqlite_error_code(),
            Some(rusqlite::ErrorCode::ConstraintViolation)
        )
    }
}

pub type DbResult<T> = Result<T, DbError>;
