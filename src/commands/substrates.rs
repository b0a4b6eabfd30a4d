//! Substrate commands: list, add, rename, delete.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial implementation

use anyhow::{Context, Result};
use serde_json::json;

use crate::db::SqlHelper;
use crate::output::OutputControls;
use crate::taxa::helpers;

pub fn list(helper: &SqlHelper, output: &OutputControls) -> Result<()> {
    let substrates = helpers::list_substrates(helper)?;
    output.show(&substrates, |substrates| {
        if substrates.is_empty() {
            println!("No substrates found.");
            return;
        }
        println!("Substrates ({}):", substrates.len());
        for s in substrates {
            println!("[{}] {}", s.id, s.name);
        }
    });
    Ok(())
}

pub fn add(helper: &SqlHelper, name: &str, output: &OutputControls) -> Result<()> {
    let id = helpers::add_substrate(helper, name)
        .with_context(|| format!("Failed to add substrate {}", name))?;
    output.show(&json!({ "id": id, "name": name }), |_| {
        println!("Added substrate: {} (id {})", name, id);
    });
    Ok(())
}

pub fn rename(helper: &SqlHelper, id: i64, name: &str, output: &OutputControls) -> Result<()> {
    helpers::rename_substrate(helper, id, name)?;
    output.show(&json!({ "id": id, "name": name }), |_| {
        println!("Renamed substrate {} to {}", id, name);
    });
    Ok(())
}

pub fn delete(helper: &SqlHelper, id: i64, output: &OutputControls) -> Result<()> {
    helpers::delete_substrate(helper, id)?;
    output.show(&json!({ "id": id, "deleted": true }), |_| {
        println!("Deleted substrate {}", id);
    });
    Ok(())
}
