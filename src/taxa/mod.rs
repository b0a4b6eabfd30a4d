//! Curation layer: taxa, synonyms ("other names") and substrates.
//!
//! CHANGELOG:
//! - 10/18/2026 - Vernacular names, per-synonym authors, picker labels
//! - 10/18/2026 - Initial records and curation helpers

pub mod fuzzy;
pub mod helpers;
pub mod queries;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::db::DbError;

#[derive(Error, Debug)]
pub enum CurationError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Unknown {kind}: {name}")]
    Unknown { kind: &'static str, name: String },

    #[error("No {kind} with id {id}")]
    NotFound { kind: &'static str, id: i64 },

    #[error("The {kind} {name} already exists")]
    Duplicate { kind: &'static str, name: String },

    #[error("{authors} authors given for {synonyms} synonyms")]
    TooManyAuthors { synonyms: usize, authors: usize },

    #[error("Nothing to change")]
    EmptyEdit,
}

pub type CurationResult<T> = Result<T, CurationError>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Taxon {
    pub id: i64,
    pub name: String,
    pub author: Option<String>,
    pub level: String,
    pub status: String,
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<Synonym>,
}

impl Taxon {
    /// Picker label: `(Genus) Parmelia`.
    pub fn label(&self) -> String {
        format!("({}) {}", self.level, self.name)
    }
}

/// Taxon name from a picker label; plain names pass through unchanged.
pub fn name_from_label(label: &str) -> &str {
    let trimmed = label.trim();
    match trimmed.strip_prefix('(').and_then(|rest| rest.split_once(") ")) {
        Some((_, name)) if !name.trim().is_empty() => name.trim(),
        _ => trimmed,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Synonym {
    pub id: i64,
    pub taxon_id: i64,
    pub name: String,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Substrate {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonLevel {
    pub id: i64,
    pub name: String,
    pub rank: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonStatus {
    pub id: i64,
    pub name: String,
}

/// Input for a new taxon. Level, status and parent are given by name.
#[derive(Debug, Clone, Default)]
pub struct NewTaxon {
    pub name: String,
    pub author: Option<String>,
    pub level: String,
    /// Defaults to "accepted".
    pub status: Option<String>,
    /// Name or picker label of the parent taxon.
    pub parent: Option<String>,
    pub english_name: Option<String>,
    pub local_name: Option<String>,
    pub synonyms: Vec<String>,
    /// Author of each synonym, by position. May be shorter than `synonyms`.
    pub synonym_authors: Vec<String>,
}

/// Fields to change on an existing taxon; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct TaxonEdit {
    pub name: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
    pub english_name: Option<String>,
    pub local_name: Option<String>,
}

/// Where a searchable name comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NameKind {
    Taxon,
    Synonym,
}

impl NameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NameKind::Taxon => "taxon",
            NameKind::Synonym => "synonym",
        }
    }
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromSql for NameKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "taxon" => Ok(NameKind::Taxon),
            "synonym" => Ok(NameKind::Synonym),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// A fuzzy name suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub name: String,
    pub kind: NameKind,
    /// Accepted taxon the name belongs to.
    pub taxon_id: i64,
    pub score: f64,
    pub strategy: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        let taxon = Taxon {
            id: 1,
            name: "Parmelia sulcata".to_string(),
            author: None,
            level: "Species".to_string(),
            status: "accepted".to_string(),
            parent: None,
            english_name: None,
            local_name: None,
            synonyms: Vec::new(),
        };
        assert_eq!(taxon.label(), "(Species) Parmelia sulcata");
        assert_eq!(name_from_label(&taxon.label()), "Parmelia sulcata");
    }

    #[test]
    fn test_name_from_plain_name() {
        assert_eq!(name_from_label("Parmelia"), "Parmelia");
        assert_eq!(name_from_label("  Usnea  "), "Usnea");
        assert_eq!(name_from_label("(Genus) "), "(Genus)");
    }

    #[test]
    fn test_name_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&NameKind::Synonym).unwrap(), r#""synonym""#);
        assert_eq!(NameKind::Taxon.to_string(), "taxon");
    }
}
