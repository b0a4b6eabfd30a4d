//! `SqlHelper`: parameterized CRUD over a single SQLite connection.
//!
//! All statements go through [`SqlHelper::execute_query`] or
//! [`SqlHelper::query_map`], which log the query text and parameters on
//! failure before returning the error. Plain writes autocommit; use
//! [`SqlHelper::transaction`] to group several writes.
//!
//! CHANGELOG:
//! - 10/18/2026 - Scoped transactions and atomic table cleaning
//! - 10/18/2026 - Initial CRUD helpers, script import, dump export

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use super::connection::{apply_pragmas, open_db, open_in_memory};
use super::dump::Dump;
use super::error::{DbError, DbResult};
use super::query::{
    build_delete, build_insert, build_select, build_update, check_identifier, value_as_i64,
    Columns, Conjunction, Filter, Modifier,
};

/// One result row, columns in projection order.
pub type Row = Vec<Value>;

/// Owns the connection to one database file.
pub struct SqlHelper {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqlHelper {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        Ok(Self {
            conn: open_db(path)?,
            path: Some(path.to_path_buf()),
        })
    }

    /// Private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_in_memory()?,
            path: None,
        })
    }

    /// Path of the database file (`None` for in-memory databases).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ========================================================================
    // Execution choke point
    // ========================================================================

    fn logged<T>(
        &self,
        sql: &str,
        values: &[Value],
        run: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> DbResult<T> {
        run(&self.conn).map_err(|source| {
            let params = format!("{:?}", values);
            tracing::error!(sql = %sql, params = %params, error = %source, "query failed");
            DbError::Query {
                sql: sql.to_string(),
                params,
                source,
            }
        })
    }

    /// Execute one parameterized statement; returns the affected row count.
    pub fn execute_query(&self, sql: &str, values: &[Value]) -> DbResult<usize> {
        tracing::trace!(sql = %sql, "execute");
        self.logged(sql, values, |conn| {
            conn.execute(sql, params_from_iter(values.iter()))
        })
    }

    /// Run a parameterized query and map every row.
    pub fn query_map<T, F>(&self, sql: &str, values: &[Value], mut f: F) -> DbResult<Vec<T>>
    where
        F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        tracing::trace!(sql = %sql, "query");
        self.logged(sql, values, |conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), |row| f(row))?;
            rows.collect()
        })
    }

    /// Run a parameterized query and return the raw rows.
    pub fn query_rows(&self, sql: &str, values: &[Value]) -> DbResult<Vec<Row>> {
        tracing::trace!(sql = %sql, "query");
        self.logged(sql, values, |conn| {
            let mut stmt = conn.prepare(sql)?;
            let width = stmt.column_count();
            let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
                (0..width)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<rusqlite::Result<Row>>()
            })?;
            rows.collect()
        })
    }

    /// Execute a multi-statement script without parameter binding.
    ///
    /// A script that fails after its own `BEGIN` is rolled back, so the
    /// connection is back in autocommit mode either way.
    pub fn execute_script(&self, sql: &str) -> DbResult<()> {
        tracing::debug!(bytes = sql.len(), "executing script");
        let result = self.conn.execute_batch(sql);
        if result.is_err() && !self.conn.is_autocommit() {
            tracing::warn!("script left a transaction open, rolling back");
            if let Err(rollback) = self.conn.execute_batch("ROLLBACK;") {
                tracing::error!(error = %rollback, "rollback failed");
            }
        }
        // Always restore pragmas, even after a failed script.
        let pragmas = apply_pragmas(&self.conn);
        if let Err(source) = result {
            tracing::error!(error = %source, "script failed");
            return Err(DbError::Script(source));
        }
        pragmas.map_err(DbError::Script)
    }

    /// Stream SQL statements that rebuild this database's schema and content.
    ///
    /// Each table's rows are read only when the iterator reaches it.
    pub fn export_db(&self) -> DbResult<Dump<'_>> {
        Dump::new(self)
    }

    // ========================================================================
    // Row operations
    // ========================================================================

    /// Insert one row; returns its rowid.
    pub fn insert_row(&self, table: &str, columns: &str, values: &[Value]) -> DbResult<i64> {
        let columns = Columns::parse(columns)?;
        check_count(columns.len(), values.len())?;
        let sql = build_insert(table, &columns)?;
        self.execute_query(&sql, values)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Delete rows matching `columns` (AND-joined), or every row when
    /// `columns` is `None`. Returns the number of deleted rows.
    pub fn delete_row(
        &self,
        table: &str,
        columns: Option<&str>,
        values: &[Value],
    ) -> DbResult<usize> {
        let filter = columns
            .map(|c| Filter::parse(c, Conjunction::And))
            .transpose()?;
        check_count(filter.as_ref().map_or(0, Filter::len), values.len())?;
        let sql = build_delete(table, filter.as_ref())?;
        self.execute_query(&sql, values)
    }

    /// `UPDATE table SET set_columns WHERE where_columns`.
    ///
    /// `values` holds the SET values followed by the WHERE values.
    pub fn update(
        &self,
        table: &str,
        set_columns: &str,
        where_columns: &str,
        values: &[Value],
    ) -> DbResult<usize> {
        let set = Columns::parse(set_columns)?;
        let filter = Filter::parse(where_columns, Conjunction::And)?;
        check_count(set.len() + filter.len(), values.len())?;
        let sql = build_update(table, &set, &filter)?;
        self.execute_query(&sql, values)
    }

    /// `SELECT` with an optional filter and modifier.
    pub fn select(
        &self,
        table: &str,
        get_columns: &str,
        filter: Option<&Filter>,
        values: &[Value],
        modifier: Modifier,
    ) -> DbResult<Vec<Row>> {
        let columns = Columns::parse(get_columns)?;
        check_count(filter.map_or(0, Filter::len), values.len())?;
        let sql = build_select(table, &columns, filter, modifier)?;
        self.query_rows(&sql, values)
    }

    /// `id_column` of the first row of `table` matching `where_columns`.
    ///
    /// Same matching rules as [`SqlHelper::sql_get_values`], including the
    /// single-value broadcast.
    pub fn sql_get_id(
        &self,
        table: &str,
        id_column: &str,
        where_columns: &str,
        values: &[Value],
        conjunction: Conjunction,
    ) -> DbResult<Option<i64>> {
        let rows = self.sql_get_values(table, id_column, where_columns, values, conjunction)?;
        Ok(rows
            .first()
            .and_then(|row| row.first())
            .and_then(value_as_i64))
    }

    /// Rows of `table` matching `where_columns` joined by `conjunction`.
    ///
    /// A single value is compared against every where column, which turns an
    /// `Or` conjunction into a "matches any of these columns" search.
    pub fn sql_get_values(
        &self,
        table: &str,
        get_columns: &str,
        where_columns: &str,
        values: &[Value],
        conjunction: Conjunction,
    ) -> DbResult<Vec<Row>> {
        let filter = Filter::parse(where_columns, conjunction)?;
        let values = broadcast(values, filter.len())?;
        self.select(table, get_columns, Some(&filter), &values, Modifier::None)
    }

    /// Every row of `table`.
    pub fn sql_get_all(&self, table: &str) -> DbResult<Vec<Row>> {
        self.select(table, "*", None, &[], Modifier::None)
    }

    /// Number of rows in `table`.
    pub fn sql_count(&self, table: &str) -> DbResult<i64> {
        let rows = self.select(table, "*", None, &[], Modifier::Count)?;
        Ok(rows
            .first()
            .and_then(|row| row.first())
            .and_then(value_as_i64)
            .unwrap_or(0))
    }

    /// Delete every row of each table, in order, one autocommit per table.
    ///
    /// Stops at the first failure. Tables emptied before it stay emptied.
    pub fn sql_table_clean(&self, tables: &[&str]) -> DbResult<()> {
        for table in tables {
            let removed = self.delete_row(table, None, &[])?;
            tracing::info!(table = %table, removed, "table cleaned");
        }
        Ok(())
    }

    /// Like [`SqlHelper::sql_table_clean`], but all tables or none.
    pub fn clean_tables_atomic(&self, tables: &[&str]) -> DbResult<()> {
        self.transaction(|helper| helper.sql_table_clean(tables))
    }

    // ========================================================================
    // Transactions & schema introspection
    // ========================================================================

    /// Run `f` inside a transaction. Commits on `Ok`, rolls back on `Err`.
    ///
    /// Transactions do not nest.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(DbError::Transaction)?;
        match f(self) {
            Ok(value) => {
                tx.commit().map_err(DbError::Transaction)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback() {
                    tracing::error!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Names of user tables, sorted.
    pub fn table_names(&self) -> DbResult<Vec<String>> {
        self.query_map(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            &[],
            |row| row.get(0),
        )
    }

    /// Column names of `table`, in declaration order.
    pub fn column_names(&self, table: &str) -> DbResult<Vec<String>> {
        let sql = format!("PRAGMA table_info(\"{}\")", table.replace('"', "\"\""));
        self.query_map(&sql, &[], |row| row.get(1))
    }

    /// True if `table` exists.
    pub fn has_table(&self, table: &str) -> DbResult<bool> {
        check_identifier(table)?;
        Ok(self.table_names()?.iter().any(|t| t == table))
    }
}

fn check_count(expected: usize, got: usize) -> DbResult<()> {
    if expected == got {
        Ok(())
    } else {
        tracing::error!(expected, got, "parameter count mismatch");
        Err(DbError::ParamCount { expected, got })
    }
}

/// Repeat a single value across `width` placeholders.
fn broadcast(values: &[Value], width: usize) -> DbResult<Cow<'_, [Value]>> {
    match values {
        [single] if width > 1 => Ok(Cow::Owned(vec![single.clone(); width])),
        _ => {
            check_count(width, values.len())?;
            Ok(Cow::Borrowed(values))
        }
    }
}
