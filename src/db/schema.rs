//! Taxonomy schema and lookup-table seeding.
//!
//! CHANGELOG:
//! - 10/18/2026 - English and local taxon names
//! - 10/18/2026 - Initial schema (taxa, levels, statuses, other names, substrates)

use rusqlite::types::Value;

use super::error::DbResult;
use super::helper::SqlHelper;
use super::query::text;

/// Schema script. Safe to run against an existing database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS taxon_level (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    rank INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS taxon_status (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS taxon (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    author TEXT,
    level_id INTEGER NOT NULL REFERENCES taxon_level(id),
    status_id INTEGER NOT NULL REFERENCES taxon_status(id),
    parent_id INTEGER REFERENCES taxon(id),
    english_name TEXT,
    local_name TEXT
);

CREATE TABLE IF NOT EXISTS other_name (
    id INTEGER PRIMARY KEY,
    taxon_id INTEGER NOT NULL REFERENCES taxon(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    author TEXT,
    UNIQUE (taxon_id, name)
);

CREATE TABLE IF NOT EXISTS substrate (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE INDEX IF NOT EXISTS idx_taxon_parent ON taxon(parent_id);
CREATE INDEX IF NOT EXISTS idx_other_name_name ON other_name(name);
"#;

/// Taxon levels with their rank (lower is higher in the hierarchy).
pub const DEFAULT_LEVELS: &[(&str, i64)] = &[
    ("Kingdom", 10),
    ("Phylum", 20),
    ("Class", 30),
    ("Order", 40),
    ("Family", 50),
    ("Genus", 60),
    ("Species", 70),
    ("Subspecies", 80),
    ("Variety", 90),
    ("Form", 100),
];

pub const DEFAULT_STATUSES: &[&str] = &["accepted", "synonym", "doubtful"];

/// Create missing tables and seed empty lookup tables.
pub fn init_schema(helper: &SqlHelper) -> DbResult<()> {
    helper.execute_script(SCHEMA)?;
    helper.transaction(|h| {
        if h.sql_count("taxon_level")? == 0 {
            for (name, rank) in DEFAULT_LEVELS {
                h.insert_row("taxon_level", "name, rank", &[text(*name), Value::Integer(*rank)])?;
            }
        }
        if h.sql_count("taxon_status")? == 0 {
            for name in DEFAULT_STATUSES {
                h.insert_row("taxon_status", "name", &[text(*name)])?;
            }
        }
        Ok(())
    })
}
