//! Curation helpers - shared by the CLI commands.
//!
//! These functions accept `&SqlHelper` so callers decide which database
//! file they work on. Writes that touch several rows run in one transaction.
//!
//! CHANGELOG:
//! - 10/18/2026 - Duplicate checks, per-synonym authors, batch synonym adds
//! - 10/18/2026 - Fuzzy suggestions over taxa and synonyms
//! - 10/18/2026 - Initial taxon, synonym and substrate helpers

use rusqlite::types::Value;

use super::{
    fuzzy, name_from_label, queries, CurationError, CurationResult, NameKind, NewTaxon,
    Substrate, Suggestion, Synonym, Taxon, TaxonEdit, TaxonLevel, TaxonStatus,
};
use crate::db::query::{opt_text, text, value_as_i64, value_as_text};
use crate::db::{Conjunction, Modifier, SqlHelper};

/// Status given to new taxa when none is specified.
pub const DEFAULT_STATUS: &str = "accepted";

// ============================================================================
// Lookups
// ============================================================================

/// Id of the row of `table` named `name`.
fn resolve(
    helper: &SqlHelper,
    table: &str,
    kind: &'static str,
    name: &str,
) -> CurationResult<i64> {
    helper
        .sql_get_id(table, "id", "name", &[text(name)], Conjunction::And)?
        .ok_or_else(|| CurationError::Unknown {
            kind,
            name: name.to_string(),
        })
}

/// Id of a taxon given by name or picker label.
fn resolve_taxon(helper: &SqlHelper, kind: &'static str, name: &str) -> CurationResult<i64> {
    resolve(helper, "taxon", kind, name_from_label(name))
}

/// Pair each synonym with the author at the same position.
///
/// Missing or blank authors become `None`; more authors than synonyms is an error.
pub fn pair_synonyms<'a>(
    synonyms: &'a [String],
    authors: &'a [String],
) -> CurationResult<Vec<(&'a str, Option<&'a str>)>> {
    if authors.len() > synonyms.len() {
        return Err(CurationError::TooManyAuthors {
            synonyms: synonyms.len(),
            authors: authors.len(),
        });
    }
    Ok(synonyms
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let author = authors
                .get(i)
                .map(|a| a.trim())
                .filter(|a| !a.is_empty());
            (name.trim(), author)
        })
        .collect())
}

fn map_taxon(row: &rusqlite::Row<'_>) -> rusqlite::Result<Taxon> {
    Ok(Taxon {
        id: row.get(0)?,
        name: row.get(1)?,
        author: row.get(2)?,
        level: row.get(3)?,
        status: row.get(4)?,
        parent: row.get(5)?,
        english_name: row.get(6)?,
        local_name: row.get(7)?,
        synonyms: Vec::new(),
    })
}

fn map_synonym(row: &rusqlite::Row<'_>) -> rusqlite::Result<Synonym> {
    Ok(Synonym {
        id: row.get(0)?,
        taxon_id: row.get(1)?,
        name: row.get(2)?,
        author: row.get(3)?,
    })
}

pub fn list_levels(helper: &SqlHelper) -> CurationResult<Vec<TaxonLevel>> {
    Ok(helper.query_map(queries::LEVELS, &[], |row| {
        Ok(TaxonLevel {
            id: row.get(0)?,
            name: row.get(1)?,
            rank: row.get(2)?,
        })
    })?)
}

pub fn list_statuses(helper: &SqlHelper) -> CurationResult<Vec<TaxonStatus>> {
    let rows = helper.select("taxon_status", "id, name", None, &[], Modifier::None)?;
    Ok(rows
        .iter()
        .filter_map(|row| match row.as_slice() {
            [id, name] => Some(TaxonStatus {
                id: value_as_i64(id)?,
                name: value_as_text(name)?.to_string(),
            }),
            _ => None,
        })
        .collect())
}

/// Picker labels of every taxon, highest rank first.
pub fn taxon_labels(helper: &SqlHelper) -> CurationResult<Vec<String>> {
    Ok(list_taxa(helper, None)?.iter().map(Taxon::label).collect())
}

// ============================================================================
// Taxa
// ============================================================================

/// Insert a taxon and its synonyms in one transaction; returns the taxon id.
///
/// Fails with `Duplicate` when a taxon of that name already exists.
pub fn add_taxon(helper: &SqlHelper, new: &NewTaxon) -> CurationResult<i64> {
    let synonyms = pair_synonyms(&new.synonyms, &new.synonym_authors)?;
    let level_id = resolve(helper, "taxon_level", "level", &new.level)?;
    let status = new.status.as_deref().unwrap_or(DEFAULT_STATUS);
    let status_id = resolve(helper, "taxon_status", "status", status)?;
    let parent_id = new
        .parent
        .as_deref()
        .map(|parent| resolve_taxon(helper, "parent taxon", parent))
        .transpose()?;
    if helper
        .sql_get_id("taxon", "id", "name", &[text(&new.name)], Conjunction::And)?
        .is_some()
    {
        return Err(CurationError::Duplicate {
            kind: "taxon",
            name: new.name.clone(),
        });
    }

    helper.transaction(|h| {
        let id = h.insert_row(
            "taxon",
            "name, author, level_id, status_id, parent_id, english_name, local_name",
            &[
                text(&new.name),
                opt_text(new.author.as_deref()),
                Value::Integer(level_id),
                Value::Integer(status_id),
                parent_id.map_or(Value::Null, Value::Integer),
                opt_text(new.english_name.as_deref()),
                opt_text(new.local_name.as_deref()),
            ],
        )?;
        for (name, author) in &synonyms {
            insert_synonym(h, id, name, *author)?;
        }
        tracing::info!(id, name = %new.name, synonyms = synonyms.len(), "taxon added");
        Ok(id)
    })
}

/// Change name, author, status or vernacular names of taxon `id`.
///
/// An empty author or vernacular name clears it.
pub fn edit_taxon(helper: &SqlHelper, id: i64, edit: &TaxonEdit) -> CurationResult<()> {
    let mut columns: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(name) = &edit.name {
        columns.push("name");
        values.push(text(name));
    }
    if let Some(author) = &edit.author {
        columns.push("author");
        values.push(opt_text(Some(author.as_str()).filter(|a| !a.is_empty())));
    }
    if let Some(status) = &edit.status {
        columns.push("status_id");
        values.push(Value::Integer(resolve(helper, "taxon_status", "status", status)?));
    }
    for (column, field) in [
        ("english_name", &edit.english_name),
        ("local_name", &edit.local_name),
    ] {
        if let Some(value) = field {
            columns.push(column);
            values.push(opt_text(Some(value.as_str()).filter(|v| !v.is_empty())));
        }
    }
    if columns.is_empty() {
        return Err(CurationError::EmptyEdit);
    }
    values.push(Value::Integer(id));

    let changed = helper.update("taxon", &columns.join(", "), "id", &values)?;
    if changed == 0 {
        return Err(CurationError::NotFound { kind: "taxon", id });
    }
    tracing::info!(id, fields = %columns.join(", "), "taxon edited");
    Ok(())
}

/// All taxa, optionally only those of one level.
pub fn list_taxa(helper: &SqlHelper, level: Option<&str>) -> CurationResult<Vec<Taxon>> {
    let taxa = match level {
        Some(level) => {
            resolve(helper, "taxon_level", "level", level)?;
            helper.query_map(queries::TAXA_BY_LEVEL, &[text(level)], map_taxon)?
        }
        None => helper.query_map(queries::TAXA, &[], map_taxon)?,
    };
    Ok(taxa)
}

/// One taxon with its synonyms, by exact name.
pub fn get_taxon(helper: &SqlHelper, name: &str) -> CurationResult<Option<Taxon>> {
    let found = helper
        .query_map(queries::TAXON_BY_NAME, &[text(name)], map_taxon)?
        .into_iter()
        .next();
    match found {
        Some(mut taxon) => {
            taxon.synonyms = synonyms_of(helper, taxon.id)?;
            Ok(Some(taxon))
        }
        None => Ok(None),
    }
}

// ============================================================================
// Synonyms
// ============================================================================

fn synonyms_of(helper: &SqlHelper, taxon_id: i64) -> CurationResult<Vec<Synonym>> {
    Ok(helper.query_map(queries::SYNONYMS_OF, &[Value::Integer(taxon_id)], map_synonym)?)
}

fn insert_synonym(
    helper: &SqlHelper,
    taxon_id: i64,
    name: &str,
    author: Option<&str>,
) -> CurationResult<i64> {
    let existing = helper.sql_get_id(
        "other_name",
        "id",
        "taxon_id, name",
        &[Value::Integer(taxon_id), text(name)],
        Conjunction::And,
    )?;
    if existing.is_some() {
        return Err(CurationError::Duplicate {
            kind: "synonym",
            name: name.to_string(),
        });
    }
    let id = helper.insert_row(
        "other_name",
        "taxon_id, name, author",
        &[Value::Integer(taxon_id), text(name), opt_text(author)],
    )?;
    tracing::info!(id, taxon_id, name, "synonym added");
    Ok(id)
}

pub fn add_synonym(
    helper: &SqlHelper,
    taxon: &str,
    name: &str,
    author: Option<&str>,
) -> CurationResult<i64> {
    let taxon_id = resolve_taxon(helper, "taxon", taxon)?;
    insert_synonym(helper, taxon_id, name, author)
}

/// Add several synonyms, each with the author at the same position, all or none.
pub fn add_synonyms(
    helper: &SqlHelper,
    taxon: &str,
    names: &[String],
    authors: &[String],
) -> CurationResult<Vec<i64>> {
    let pairs = pair_synonyms(names, authors)?;
    let taxon_id = resolve_taxon(helper, "taxon", taxon)?;
    helper.transaction(|h| {
        pairs
            .iter()
            .map(|(name, author)| insert_synonym(h, taxon_id, name, *author))
            .collect()
    })
}

pub fn list_synonyms(helper: &SqlHelper, taxon: &str) -> CurationResult<Vec<Synonym>> {
    let taxon_id = resolve_taxon(helper, "taxon", taxon)?;
    synonyms_of(helper, taxon_id)
}

pub fn remove_synonym(helper: &SqlHelper, id: i64) -> CurationResult<()> {
    let removed = helper.delete_row("other_name", Some("id"), &[Value::Integer(id)])?;
    if removed == 0 {
        return Err(CurationError::NotFound { kind: "synonym", id });
    }
    Ok(())
}

// ============================================================================
// Substrates
// ============================================================================

pub fn list_substrates(helper: &SqlHelper) -> CurationResult<Vec<Substrate>> {
    let rows = helper.select("substrate", "id, name", None, &[], Modifier::None)?;
    Ok(rows
        .iter()
        .filter_map(|row| match row.as_slice() {
            [id, name] => Some(Substrate {
                id: value_as_i64(id)?,
                name: value_as_text(name)?.to_string(),
            }),
            _ => None,
        })
        .collect())
}

pub fn add_substrate(helper: &SqlHelper, name: &str) -> CurationResult<i64> {
    Ok(helper.insert_row("substrate", "name", &[text(name)])?)
}

pub fn rename_substrate(helper: &SqlHelper, id: i64, name: &str) -> CurationResult<()> {
    let changed = helper.update("substrate", "name", "id", &[text(name), Value::Integer(id)])?;
    if changed == 0 {
        return Err(CurationError::NotFound {
            kind: "substrate",
            id,
        });
    }
    Ok(())
}

pub fn delete_substrate(helper: &SqlHelper, id: i64) -> CurationResult<()> {
    let removed = helper.delete_row("substrate", Some("id"), &[Value::Integer(id)])?;
    if removed == 0 {
        return Err(CurationError::NotFound {
            kind: "substrate",
            id,
        });
    }
    Ok(())
}

// ============================================================================
// Search
// ============================================================================

/// Names of taxa and synonyms resembling `query`, best first.
pub fn suggest(helper: &SqlHelper, query: &str, limit: usize) -> CurationResult<Vec<Suggestion>> {
    let names: Vec<(String, NameKind, i64)> = helper.query_map(queries::ALL_NAMES, &[], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    })?;

    let mut suggestions: Vec<Suggestion> = names
        .into_iter()
        .filter_map(|(name, kind, taxon_id)| {
            let m = fuzzy::score(query, &name);
            (m.score >= fuzzy::DEFAULT_THRESHOLD).then(|| Suggestion {
                name,
                kind,
                taxon_id,
                score: m.score,
                strategy: m.strategy,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    suggestions.truncate(limit);
    Ok(suggestions)
}
