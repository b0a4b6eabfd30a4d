//! Setup command: create the schema and seed lookup tables.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial implementation

use anyhow::{Context, Result};
use serde_json::json;

use crate::db::schema::init_schema;
use crate::db::SqlHelper;
use crate::output::OutputControls;
use crate::taxa::helpers::{list_levels, list_statuses};

/// Initialize the database. Safe to run more than once.
pub fn init(helper: &SqlHelper, output: &OutputControls) -> Result<()> {
    init_schema(helper).context("Failed to initialize schema")?;

    let levels = list_levels(helper)?;
    let statuses = list_statuses(helper)?;
    let path = helper
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ":memory:".to_string());

    let summary = json!({
        "database": path,
        "tables": helper.table_names()?,
        "levels": levels.len(),
        "statuses": statuses,
    });
    output.show(&summary, |_| {
        println!("Initialized {}", path);
        let names: Vec<&str> = statuses.iter().map(|s| s.name.as_str()).collect();
        println!("{} taxon levels, statuses: {}", levels.len(), names.join(", "));
    });
    Ok(())
}
