//! SQL text builders.
//!
//! Two layers live here:
//! - the column-list shorthand (`"name, author"`) used by the helper's
//!   convenience methods, via `get_columns` and `placeholders`;
//! - a typed builder (`Columns`, `Condition`, `Filter`) that the helper
//!   renders into statements. Shorthand strings are parsed into these types
//!   so identifiers are checked once, in one place.
//!
//! Only identifiers ever end up in the SQL text. Values are always bound.
//!
//! CHANGELOG:
//! - 10/18/2026 - Typed filter builder on top of the column shorthand
//! - 10/18/2026 - Initial get_columns / placeholders helpers

use rusqlite::types::Value;

use super::error::{DbError, DbResult};

// ============================================================================
// Column-list shorthand
// ============================================================================

/// How the conditions of a WHERE clause are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

fn split_columns(columns: &str) -> impl Iterator<Item = &str> {
    columns.split(',').map(str::trim).filter(|c| !c.is_empty())
}

/// Turn `"a, b"` into `"a=? AND b=?"` (or `OR`).
///
/// Column names are not validated here.
pub fn get_columns(columns: &str, conjunction: Conjunction) -> String {
    let separator = format!(" {} ", conjunction.as_sql());
    split_columns(columns)
        .map(|c| format!("{}=?", c))
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Turn `"a, b, c"` into `"?, ?, ?"`.
pub fn placeholders(columns: &str) -> String {
    vec!["?"; split_columns(columns).count()].join(", ")
}

/// Check that `name` is a plain SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn check_identifier(name: &str) -> DbResult<&str> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(DbError::InvalidIdentifier(name.to_string()))
    }
}

// ============================================================================
// Typed builder
// ============================================================================

/// A validated, non-empty list of column names.
///
/// `*` is accepted only as the sole entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns(Vec<String>);

impl Columns {
    /// Build from explicit names.
    pub fn new<I, S>(names: I) -> DbResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .collect();
        if names.is_empty() {
            return Err(DbError::EmptyColumns);
        }
        if names.len() == 1 && names[0] == "*" {
            return Ok(Self(names));
        }
        for name in &names {
            check_identifier(name)?;
        }
        Ok(Self(names))
    }

    /// Parse the `"a, b"` shorthand.
    pub fn parse(shorthand: &str) -> DbResult<Self> {
        Self::new(split_columns(shorthand))
    }

    /// `*`
    pub fn all() -> Self {
        Self(vec!["*".to_string()])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Render as `a, b`.
    pub fn to_list(&self) -> String {
        self.0.join(", ")
    }

    /// Render as `a=?, b=?` for a SET clause.
    pub fn to_assignments(&self) -> String {
        self.iter()
            .map(|c| format!("{}=?", c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Comparison operator of a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Gt,
    Like,
}

impl Op {
    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Like => "LIKE",
        }
    }
}

/// One `column <op> ?` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    column: String,
    op: Op,
}

impl Condition {
    pub fn new(column: &str, op: Op) -> DbResult<Self> {
        Ok(Self {
            column: check_identifier(column.trim())?.to_string(),
            op,
        })
    }

    pub fn to_sql(&self) -> String {
        match self.op {
            Op::Like => format!("{} LIKE ?", self.column),
            op => format!("{}{}?", self.column, op.as_sql()),
        }
    }
}

/// A WHERE clause: conditions joined by one conjunction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<Condition>,
    conjunction: Conjunction,
}

impl Filter {
    /// Empty filter; add conditions with [`Filter::with`].
    pub fn new(conjunction: Conjunction) -> Self {
        Self {
            conditions: Vec::new(),
            conjunction,
        }
    }

    /// Equality on every column of the shorthand, e.g. `"a, b"`.
    pub fn parse(shorthand: &str, conjunction: Conjunction) -> DbResult<Self> {
        let columns = Columns::parse(shorthand)?;
        Self::equal(&columns, conjunction)
    }

    /// Equality on every column.
    pub fn equal(columns: &Columns, conjunction: Conjunction) -> DbResult<Self> {
        let conditions = columns
            .iter()
            .map(|c| Condition::new(c, Op::Eq))
            .collect::<DbResult<Vec<_>>>()?;
        Ok(Self {
            conditions,
            conjunction,
        })
    }

    pub fn with(mut self, column: &str, op: Op) -> DbResult<Self> {
        self.conditions.push(Condition::new(column, op)?);
        Ok(self)
    }

    /// Number of placeholders in the clause.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Render without the `WHERE` keyword.
    pub fn to_sql(&self) -> String {
        let separator = format!(" {} ", self.conjunction.as_sql());
        self.conditions
            .iter()
            .map(Condition::to_sql)
            .collect::<Vec<_>>()
            .join(&separator)
    }
}

/// Optional SELECT modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modifier {
    #[default]
    None,
    Count,
    Distinct,
}

// ============================================================================
// Statement builders
// ============================================================================

fn where_clause(filter: Option<&Filter>) -> String {
    match filter {
        Some(f) if !f.is_empty() => format!(" WHERE {}", f.to_sql()),
        _ => String::new(),
    }
}

pub fn build_insert(table: &str, columns: &Columns) -> DbResult<String> {
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        check_identifier(table)?,
        columns.to_list(),
        vec!["?"; columns.len()].join(", ")
    ))
}

pub fn build_update(table: &str, set: &Columns, filter: &Filter) -> DbResult<String> {
    Ok(format!(
        "UPDATE {} SET {}{}",
        check_identifier(table)?,
        set.to_assignments(),
        where_clause(Some(filter))
    ))
}

pub fn build_delete(table: &str, filter: Option<&Filter>) -> DbResult<String> {
    Ok(format!(
        "DELETE FROM {}{}",
        check_identifier(table)?,
        where_clause(filter)
    ))
}

pub fn build_select(
    table: &str,
    columns: &Columns,
    filter: Option<&Filter>,
    modifier: Modifier,
) -> DbResult<String> {
    let projection = match modifier {
        Modifier::None => columns.to_list(),
        Modifier::Count => format!("Count({})", columns.to_list()),
        Modifier::Distinct => format!("DISTINCT {}", columns.to_list()),
    };
    Ok(format!(
        "SELECT {} FROM {}{}",
        projection,
        check_identifier(table)?,
        where_clause(filter)
    ))
}

// ============================================================================
// Value helpers
// ============================================================================

/// Text parameter.
pub fn text(value: impl Into<String>) -> Value {
    Value::Text(value.into())
}

/// Optional text parameter (`NULL` when absent).
pub fn opt_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |v| Value::Text(v.to_string()))
}

pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        _ => None,
    }
}

pub fn value_as_text(value: &Value) -> Option<&str> {
    match value {
        Value::Text(s) => Some(s.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_columns() {
        assert_eq!(get_columns("a, b", Conjunction::And), "a=? AND b=?");
        assert_eq!(get_columns("a, b", Conjunction::Or), "a=? OR b=?");
        assert_eq!(get_columns("name", Conjunction::And), "name=?");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders("a, b, c"), "?, ?, ?");
        assert_eq!(placeholders("id"), "?");
    }

    #[test]
    fn test_check_identifier() {
        assert!(check_identifier("taxon_level").is_ok());
        assert!(check_identifier("_x1").is_ok());
        assert!(check_identifier("1abc").is_err());
        assert!(check_identifier("name; DROP TABLE taxon").is_err());
        assert!(check_identifier("").is_err());
    }

    #[test]
    fn test_columns_parse() {
        let cols = Columns::parse("name, author").unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols.to_list(), "name, author");
        assert_eq!(cols.to_assignments(), "name=?, author=?");

        assert!(matches!(Columns::parse(""), Err(DbError::EmptyColumns)));
        assert!(Columns::parse("name, a b").is_err());
        assert_eq!(Columns::parse("*").unwrap(), Columns::all());
        assert!(Columns::parse("*, name").is_err());
    }

    #[test]
    fn test_filter_matches_shorthand() {
        let filter = Filter::parse("a, b", Conjunction::Or).unwrap();
        assert_eq!(filter.to_sql(), get_columns("a, b", Conjunction::Or));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_filter_operators() {
        let filter = Filter::new(Conjunction::And)
            .with("name", Op::Like)
            .unwrap()
            .with("level_id", Op::Gt)
            .unwrap();
        assert_eq!(filter.to_sql(), "name LIKE ? AND level_id>?");
    }

    #[test]
    fn test_build_statements() {
        let cols = Columns::parse("name, author").unwrap();
        assert_eq!(
            build_insert("taxon", &cols).unwrap(),
            "INSERT INTO taxon (name, author) VALUES (?, ?)"
        );

        let filter = Filter::parse("id", Conjunction::And).unwrap();
        assert_eq!(
            build_update("taxon", &cols, &filter).unwrap(),
            "UPDATE taxon SET name=?, author=? WHERE id=?"
        );
        assert_eq!(build_delete("taxon", None).unwrap(), "DELETE FROM taxon");
        assert_eq!(
            build_delete("taxon", Some(&filter)).unwrap(),
            "DELETE FROM taxon WHERE id=?"
        );
        assert_eq!(
            build_select("taxon", &Columns::all(), None, Modifier::Count).unwrap(),
            "SELECT Count(*) FROM taxon"
        );
        assert_eq!(
            build_select("taxon", &cols, Some(&filter), Modifier::Distinct).unwrap(),
            "SELECT DISTINCT name, author FROM taxon WHERE id=?"
        );
        assert!(build_delete("taxon; --", None).is_err());
    }
}
