//! Configuration: where the database lives.
//!
//! Resolution order for the database path:
//! 1. `--db` flag
//! 2. LICHEN_DB_PATH env var
//! 3. `database` key of the JSON config file
//! 4. `<data_dir>/lichen-curator/lichens.db`
//!
//! The config file is LICHEN_CONFIG_PATH, or
//! `<config_dir>/lichen-curator/config.json`. A missing file is not an error.
//!
//! CHANGELOG:
//! - 10/18/2026 - Save config (remember the database path)
//! - 10/18/2026 - Initial config loading and path resolution

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "lichen-curator";
pub const DB_PATH_ENV: &str = "LICHEN_DB_PATH";
pub const CONFIG_PATH_ENV: &str = "LICHEN_CONFIG_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode config: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to write config file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Contents of config.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file; `~` is expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl Config {
    /// Load from `path`. A missing file yields the default config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the default location.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(default_config_path())
    }

    /// Write to `path` as pretty JSON, creating its directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Encode)?;
        std::fs::write(path, content + "\n").map_err(write_err)?;
        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }
}

/// Default config.json path.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(expand(&path));
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.json")
}

/// Default database path when nothing is configured.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("lichens.db")
}

/// Resolve the database path from flag, environment and config.
pub fn resolve_db_path(flag: Option<&str>, config: &Config) -> PathBuf {
    resolve_db_path_with(flag, std::env::var(DB_PATH_ENV).ok(), config)
}

fn resolve_db_path_with(flag: Option<&str>, env: Option<String>, config: &Config) -> PathBuf {
    flag.map(str::to_string)
        .or(env)
        .or_else(|| config.database.clone())
        .map(|p| PathBuf::from(expand(&p)))
        .unwrap_or_else(default_db_path)
}

fn expand(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_order() {
        let config = Config {
            database: Some("/from/config.db".to_string()),
        };
        assert_eq!(
            resolve_db_path_with(Some("/from/flag.db"), Some("/from/env.db".into()), &config),
            PathBuf::from("/from/flag.db")
        );
        assert_eq!(
            resolve_db_path_with(None, Some("/from/env.db".into()), &config),
            PathBuf::from("/from/env.db")
        );
        assert_eq!(
            resolve_db_path_with(None, None, &config),
            PathBuf::from("/from/config.db")
        );
        assert_eq!(
            resolve_db_path_with(None, None, &Config::default()),
            default_db_path()
        );
    }

    #[test]
    fn test_default_db_path() {
        assert!(default_db_path().ends_with("lichen-curator/lichens.db"));
    }

    #[test]
    fn test_tilde_expansion() {
        let path = resolve_db_path_with(Some("~/lichens.db"), None, &Config::default());
        assert!(!path.starts_with("~"));
        assert!(path.ends_with("lichens.db"));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"database": "/data/lichens.db"}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.database.as_deref(), Some("/data/lichens.db"));

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));

        let missing = Config::load(dir.path().join("missing.json")).unwrap();
        assert!(missing.database.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            database: Some("~/lichens/mli.db".to_string()),
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.database.as_deref(), Some("~/lichens/mli.db"));
        assert!(!resolve_db_path_with(None, None, &loaded).starts_with("~"));

        Config::default().save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "{}");
    }
}
