//! Backup commands: export (SQL dump), import (restore a dump).
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial implementation

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::db::SqlHelper;
use crate::output::OutputControls;

/// Write a dump to `output_path`, or stdout when absent.
pub fn export(helper: &SqlHelper, output_path: Option<&Path>, output: &OutputControls) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {:?}", path))?;
            let statements = write_dump(helper, &mut BufWriter::new(file))?;
            output.show(
                &json!({ "path": path.display().to_string(), "statements": statements }),
                |_| println!("Exported {} statements to {}", statements, path.display()),
            );
        }
        None => {
            let stdout = std::io::stdout();
            write_dump(helper, &mut stdout.lock())?;
        }
    }
    Ok(())
}

/// Write every dump statement on its own line; returns the statement count.
pub fn write_dump<W: Write>(helper: &SqlHelper, writer: &mut W) -> Result<usize> {
    writeln!(writer, "-- lichen-curator dump, {}", chrono::Local::now().to_rfc3339())?;
    let mut count = 0;
    for statement in helper.export_db()? {
        writeln!(writer, "{}", statement?)?;
        count += 1;
    }
    writer.flush()?;
    tracing::info!(statements = count, "database exported");
    Ok(count)
}

/// Replay a dump into the database. The database must not contain tables.
pub fn import(helper: &SqlHelper, input: &Path, output: &OutputControls) -> Result<()> {
    let existing = helper.table_names()?;
    if !existing.is_empty() {
        bail!(
            "Import needs an empty database; found tables: {}",
            existing.join(", ")
        );
    }
    let script = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {:?}", input))?;
    helper
        .execute_script(&script)
        .with_context(|| format!("Failed to import {:?}", input))?;

    let tables = helper.table_names()?;
    output.show(&json!({ "imported": input.display().to_string(), "tables": tables }), |_| {
        println!("Imported {} ({} tables)", input.display(), tables.len());
    });
    Ok(())
}
