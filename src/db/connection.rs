//! SQLite connection management for the taxonomy database.
//!
//! CHANGELOG:
//! - 10/18/2026 - Open read-write with foreign keys enforced

use rusqlite::Connection;
use std::path::Path;

use super::error::{DbError, DbResult};

/// Pragmas applied to every connection. Re-applied after scripts, since a
/// restored dump switches foreign keys off.
const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// Open (or create) the database file at `path`.
pub fn open_db(path: &Path) -> DbResult<Connection> {
    let conn = Connection::open(path).map_err(|source| DbError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    apply_pragmas(&conn).map_err(|source| DbError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "opened database");
    Ok(conn)
}

/// Open a private in-memory database.
pub fn open_in_memory() -> DbResult<Connection> {
    let conn = Connection::open_in_memory().map_err(|source| DbError::Open {
        path: ":memory:".into(),
        source,
    })?;
    apply_pragmas(&conn).map_err(|source| DbError::Open {
        path: ":memory:".into(),
        source,
    })?;
    Ok(conn)
}

pub(crate) fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CONNECTION_PRAGMAS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = open_in_memory().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("lichens.db");
        let err = open_db(&path).unwrap_err();
        assert!(matches!(err, DbError::Open { .. }));
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lichens.db");
        let _conn = open_db(&path).unwrap();
        assert!(path.exists());
    }
}
