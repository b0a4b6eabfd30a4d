//! Synonym commands: add, list, remove.
//!
//! CHANGELOG:
//! - 10/18/2026 - Add several synonyms at once, each with its own author
//! - 10/18/2026 - Initial implementation

use anyhow::{Context, Result};
use serde_json::json;

use crate::db::SqlHelper;
use crate::output::{with_author, OutputControls};
use crate::taxa::helpers;

/// Add synonyms to a taxon; `authors[i]` belongs to `names[i]`.
pub fn add(
    helper: &SqlHelper,
    taxon: &str,
    names: &[String],
    authors: &[String],
    output: &OutputControls,
) -> Result<()> {
    let ids = helpers::add_synonyms(helper, taxon, names, authors)
        .with_context(|| format!("Failed to add synonyms to {}", taxon))?;
    output.show(&json!({ "ids": ids, "taxon": taxon, "names": names }), |_| {
        for (id, name) in ids.iter().zip(names) {
            println!("Added synonym: {} -> {} (id {})", name, taxon, id);
        }
    });
    Ok(())
}

pub fn list(helper: &SqlHelper, taxon: &str, output: &OutputControls) -> Result<()> {
    let synonyms = helpers::list_synonyms(helper, taxon)?;
    output.show(&synonyms, |synonyms| {
        if synonyms.is_empty() {
            println!("No synonyms for {}.", taxon);
            return;
        }
        println!("Synonyms of {} ({}):", taxon, synonyms.len());
        for s in synonyms {
            println!("[{}] {}", s.id, with_author(&s.name, s.author.as_deref()));
        }
    });
    Ok(())
}

pub fn remove(helper: &SqlHelper, id: i64, output: &OutputControls) -> Result<()> {
    helpers::remove_synonym(helper, id)?;
    output.show(&json!({ "id": id, "removed": true }), |_| {
        println!("Removed synonym {}", id);
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{quiet, seeded};
    use crate::taxa::{CurationError, NewTaxon};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn with_genus(name: &str) -> SqlHelper {
        let helper = seeded();
        helpers::add_taxon(
            &helper,
            &NewTaxon {
                name: name.to_string(),
                level: "Genus".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        helper
    }

    #[test]
    fn test_add_with_authors_then_list() {
        let helper = with_genus("Xanthoria");
        add(
            &helper,
            "(Genus) Xanthoria",
            &names(&["Teloschistes", "Gasparrinia"]),
            &names(&["Norman"]),
            &quiet(),
        )
        .unwrap();
        list(&helper, "Xanthoria", &quiet()).unwrap();

        let synonyms = helpers::list_synonyms(&helper, "Xanthoria").unwrap();
        assert_eq!(synonyms.len(), 2);
        assert_eq!(synonyms[0].name, "Gasparrinia");
        assert_eq!(synonyms[0].author, None);
        assert_eq!(synonyms[1].author.as_deref(), Some("Norman"));
    }

    #[test]
    fn test_add_more_authors_than_names_fails() {
        let helper = with_genus("Xanthoria");
        let err = add(
            &helper,
            "Xanthoria",
            &names(&["Teloschistes"]),
            &names(&["Norman", "Th. Fr."]),
            &quiet(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CurationError>(),
            Some(CurationError::TooManyAuthors { synonyms: 1, authors: 2 })
        ));
        assert!(helpers::list_synonyms(&helper, "Xanthoria").unwrap().is_empty());
    }

    #[test]
    fn test_remove() {
        let helper = with_genus("Usnea");
        add(&helper, "Usnea", &names(&["Eumitria"]), &[], &quiet()).unwrap();
        let id = helpers::list_synonyms(&helper, "Usnea").unwrap()[0].id;
        remove(&helper, id, &quiet()).unwrap();
        assert!(remove(&helper, id, &quiet()).is_err());
        assert!(list(&helper, "Nowhere", &quiet()).is_err());
    }
}
