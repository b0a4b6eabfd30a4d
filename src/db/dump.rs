//! SQL dump of a database: schema plus `INSERT` statements for every row.
//!
//! The output replays through `SqlHelper::execute_script` into an empty
//! database. Foreign keys are switched off for the replay so tables can be
//! restored in name order regardless of references between them.
//! `sqlite_sequence` counters are restored after every other table.
//!
//! CHANGELOG:
//! - 10/18/2026 - Restore AUTOINCREMENT counters last
//! - 10/18/2026 - Lazy per-table dump iterator

use std::collections::VecDeque;

use super::error::DbResult;
use super::helper::SqlHelper;

const TABLES_QUERY: &str = r#"
SELECT name, sql FROM sqlite_master
WHERE sql NOT NULL AND type = 'table'
ORDER BY name
"#;

const OBJECTS_QUERY: &str = r#"
SELECT sql FROM sqlite_master
WHERE sql NOT NULL AND type IN ('index', 'trigger', 'view')
ORDER BY rowid
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Header,
    Tables,
    Objects,
    Footer,
    Done,
}

/// Iterator over dump statements, each terminated by `;`.
///
/// One-shot: once exhausted (or after an error) it yields nothing more.
pub struct Dump<'h> {
    helper: &'h SqlHelper,
    stage: Stage,
    tables: VecDeque<(String, String)>,
    pending: VecDeque<String>,
}

impl<'h> Dump<'h> {
    pub(crate) fn new(helper: &'h SqlHelper) -> DbResult<Self> {
        let (mut tables, sequence): (VecDeque<(String, String)>, VecDeque<(String, String)>) = helper
            .query_map(TABLES_QUERY, &[], |row| Ok((row.get(0)?, row.get(1)?)))?
            .into_iter()
            .partition(|(name, _): &(String, String)| name != "sqlite_sequence");
        // sqlite_sequence only exists once an AUTOINCREMENT table does.
        tables.extend(sequence);
        Ok(Self {
            helper,
            stage: Stage::Header,
            tables,
            pending: VecDeque::from([
                "PRAGMA foreign_keys=OFF;".to_string(),
                "BEGIN TRANSACTION;".to_string(),
            ]),
        })
    }

    /// Queue the statements for the next table; false when none are left.
    fn load_next_table(&mut self) -> DbResult<bool> {
        let Some((name, sql)) = self.tables.pop_front() else {
            return Ok(false);
        };

        if name == "sqlite_sequence" {
            self.pending
                .push_back("DELETE FROM \"sqlite_sequence\";".to_string());
        } else if name == "sqlite_stat1" {
            self.pending
                .push_back("ANALYZE \"sqlite_master\";".to_string());
        } else if name.starts_with("sqlite_") {
            return Ok(true);
        } else {
            self.pending.push_back(format!("{};", sql));
        }

        let rows = self.helper.query_map(&insert_query(self.helper, &name)?, &[], |row| {
            row.get::<_, String>(0)
        })?;
        self.pending
            .extend(rows.into_iter().map(|stmt| format!("{};", stmt)));
        Ok(true)
    }

    fn load_objects(&mut self) -> DbResult<()> {
        let objects = self
            .helper
            .query_map(OBJECTS_QUERY, &[], |row| row.get::<_, String>(0))?;
        self.pending
            .extend(objects.into_iter().map(|sql| format!("{};", sql)));
        Ok(())
    }

    fn advance(&mut self) -> DbResult<Option<String>> {
        loop {
            if let Some(stmt) = self.pending.pop_front() {
                return Ok(Some(stmt));
            }
            self.stage = match self.stage {
                Stage::Header => Stage::Tables,
                Stage::Tables => {
                    if self.load_next_table()? {
                        Stage::Tables
                    } else {
                        Stage::Objects
                    }
                }
                Stage::Objects => {
                    self.load_objects()?;
                    self.pending.push_back("COMMIT;".to_string());
                    Stage::Footer
                }
                Stage::Footer | Stage::Done => return Ok(None),
            };
        }
    }
}

impl Iterator for Dump<'_> {
    type Item = DbResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stage == Stage::Done {
            return None;
        }
        match self.advance() {
            Ok(Some(stmt)) => Some(Ok(stmt)),
            Ok(None) => {
                self.stage = Stage::Done;
                None
            }
            Err(e) => {
                self.stage = Stage::Done;
                self.pending.clear();
                Some(Err(e))
            }
        }
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `SELECT 'INSERT INTO "t" VALUES(' || quote("a") || ',' || ... || ')' FROM "t"`
fn insert_query(helper: &SqlHelper, table: &str) -> DbResult<String> {
    let table_ident = quote_ident(table);
    let values = helper
        .column_names(table)?
        .iter()
        .map(|col| format!("quote({})", quote_ident(col)))
        .collect::<Vec<_>>()
        .join(" || ',' || ");
    // Single quotes inside the literal prefix must be doubled.
    let prefix = format!("INSERT INTO {} VALUES(", table_ident).replace('\'', "''");
    Ok(format!(
        "SELECT '{}' || {} || ')' FROM {}",
        prefix, values, table_ident
    ))
}
