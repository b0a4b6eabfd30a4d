//! Config commands: show, set-db.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial implementation

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::path::Path;

use crate::config::{resolve_db_path, Config};
use crate::output::OutputControls;

/// Show the config file and the database path it resolves to.
pub fn show(config_path: &Path, db_flag: Option<&str>, output: &OutputControls) -> Result<()> {
    let config = Config::load(config_path)?;
    let resolved = resolve_db_path(db_flag, &config);
    let summary = json!({
        "config": config_path.display().to_string(),
        "database": config.database,
        "resolved": resolved.display().to_string(),
    });
    output.show(&summary, |_| {
        println!("Config file: {}", config_path.display());
        println!(
            "Configured database: {}",
            config.database.as_deref().unwrap_or("(not set)")
        );
        println!("Database in use: {}", resolved.display());
    });
    Ok(())
}

/// Remember `db` as the database path, keeping the rest of the config.
pub fn set_db(config_path: &Path, db: &str, output: &OutputControls) -> Result<()> {
    let db = db.trim();
    if db.is_empty() {
        bail!("Database path must not be empty");
    }
    let mut config = Config::load(config_path)?;
    config.database = Some(db.to_string());
    config
        .save(config_path)
        .with_context(|| format!("Failed to save database path {}", db))?;
    output.show(&json!({ "config": config_path.display().to_string(), "database": db }), |_| {
        println!("Database set to {} (in {})", db, config_path.display());
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::quiet;

    #[test]
    fn test_set_db_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        set_db(&config_path, "/data/first.db", &quiet()).unwrap();
        set_db(&config_path, " /data/second.db ", &quiet()).unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.database.as_deref(), Some("/data/second.db"));
        show(&config_path, None, &quiet()).unwrap();
    }

    #[test]
    fn test_set_db_rejects_empty_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        assert!(set_db(&config_path, "  ", &quiet()).is_err());
        assert!(!config_path.exists());
    }
}
