//! Maintenance commands: count, clean.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial implementation

use anyhow::{bail, Context, Result};
use serde_json::json;

use crate::db::SqlHelper;
use crate::output::OutputControls;

/// Print the number of rows in a table.
pub fn count(helper: &SqlHelper, table: &str, output: &OutputControls) -> Result<()> {
    if !helper.has_table(table)? {
        bail!("No such table: {}", table);
    }
    let rows = helper
        .sql_count(table)
        .with_context(|| format!("Failed to count rows of {}", table))?;
    output.show(&json!({ "table": table, "count": rows }), |_| {
        println!("{}: {}", table, rows);
    });
    Ok(())
}

/// Delete every row of the given tables.
///
/// Without `atomic`, tables are cleaned one by one and a failure leaves the
/// earlier tables emptied. With `atomic`, all tables are cleaned or none.
pub fn clean(
    helper: &SqlHelper,
    tables: &[String],
    atomic: bool,
    output: &OutputControls,
) -> Result<()> {
    for table in tables {
        if !helper.has_table(table)? {
            bail!("No such table: {}", table);
        }
    }
    let names: Vec<&str> = tables.iter().map(String::as_str).collect();

    let result = if atomic {
        helper.clean_tables_atomic(&names)
    } else {
        helper.sql_table_clean(&names)
    };
    result.with_context(|| {
        if atomic {
            "Clean failed; no table was changed".to_string()
        } else {
            "Clean failed; tables before the failing one were emptied".to_string()
        }
    })?;

    output.show(&json!({ "cleaned": names, "atomic": atomic }), |_| {
        println!("Cleaned: {}", names.join(", "));
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{quiet, seeded};
    use crate::taxa::{helpers, NewTaxon};

    /// Database where `taxon_level` is still referenced by a taxon.
    fn referenced_levels() -> SqlHelper {
        let helper = seeded();
        helpers::add_substrate(&helper, "bark").unwrap();
        helpers::add_taxon(
            &helper,
            &NewTaxon {
                name: "Candelaria".to_string(),
                level: "Genus".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        helper
    }

    fn tables(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_count() {
        let helper = referenced_levels();
        count(&helper, "substrate", &quiet()).unwrap();
        count(&helper, "taxon", &quiet()).unwrap();
    }

    #[test]
    fn test_count_unknown_table() {
        let helper = seeded();
        let err = count(&helper, "specimen", &quiet()).unwrap_err();
        assert!(err.to_string().contains("No such table: specimen"));
        assert!(count(&helper, "taxon; DROP TABLE taxon", &quiet()).is_err());
        assert!(helper.has_table("taxon").unwrap());
    }

    #[test]
    fn test_clean_partial_on_foreign_key_failure() {
        let helper = referenced_levels();
        let err = clean(&helper, &tables(&["substrate", "taxon_level"]), false, &quiet())
            .unwrap_err();
        assert!(err.to_string().contains("tables before the failing one were emptied"));
        assert_eq!(helper.sql_count("substrate").unwrap(), 0);
        assert!(helper.sql_count("taxon_level").unwrap() > 0);
    }

    #[test]
    fn test_clean_atomic_on_foreign_key_failure() {
        let helper = referenced_levels();
        let err = clean(&helper, &tables(&["substrate", "taxon_level"]), true, &quiet())
            .unwrap_err();
        assert!(err.to_string().contains("no table was changed"));
        assert_eq!(helper.sql_count("substrate").unwrap(), 1);
        assert_eq!(helper.sql_count("taxon").unwrap(), 1);
    }

    #[test]
    fn test_clean_in_dependency_order() {
        let helper = referenced_levels();
        clean(&helper, &tables(&["other_name", "taxon", "substrate"]), true, &quiet()).unwrap();
        assert_eq!(helper.sql_count("taxon").unwrap(), 0);
        assert_eq!(helper.sql_count("substrate").unwrap(), 0);
    }

    #[test]
    fn test_clean_unknown_table_changes_nothing() {
        let helper = referenced_levels();
        let err = clean(&helper, &tables(&["substrate", "specimen"]), false, &quiet()).unwrap_err();
        assert!(err.to_string().contains("No such table: specimen"));
        assert_eq!(helper.sql_count("substrate").unwrap(), 1);
    }
}
