//! Taxon commands: list, show, labels, add, edit, find.
//!
//! CHANGELOG:
//! - 10/18/2026 - Picker labels, vernacular names in show
//! - 10/18/2026 - Suggest similar names when show finds nothing
//! - 10/18/2026 - Initial implementation

use anyhow::{bail, Context, Result};
use serde_json::json;

use crate::db::SqlHelper;
use crate::output::{with_author, OutputControls};
use crate::taxa::{helpers, NewTaxon, Taxon, TaxonEdit};

const SUGGESTION_LIMIT: usize = 10;

/// Browse taxa, optionally one level only.
pub fn list(helper: &SqlHelper, level: Option<&str>, output: &OutputControls) -> Result<()> {
    let taxa = helpers::list_taxa(helper, level)?;

    output.show(&taxa, |taxa| {
        if taxa.is_empty() {
            println!("No taxa found.");
            return;
        }
        println!("Taxa ({}):", taxa.len());
        println!("{}", "-".repeat(50));
        for taxon in taxa {
            println!("{}", summary_line(taxon));
        }
    });
    Ok(())
}

/// Show one taxon with its synonyms.
pub fn show(helper: &SqlHelper, name: &str, output: &OutputControls) -> Result<()> {
    let Some(taxon) = helpers::get_taxon(helper, name)? else {
        let suggestions = helpers::suggest(helper, name, SUGGESTION_LIMIT)?;
        if output.json {
            output.print(&json!({ "found": false, "suggestions": suggestions }));
            return Ok(());
        }
        if suggestions.is_empty() {
            bail!("Taxon not found: {}", name);
        }
        println!("Taxon not found: {}. Did you mean:", name);
        for s in &suggestions {
            println!("  {} ({})", s.name, s.kind);
        }
        return Ok(());
    };

    output.show(&taxon, |taxon| {
        println!("{}", summary_line(taxon));
        if let Some(parent) = &taxon.parent {
            println!("  parent: {}", parent);
        }
        if let Some(english) = &taxon.english_name {
            println!("  English: {}", english);
        }
        if let Some(local) = &taxon.local_name {
            println!("  local: {}", local);
        }
        if taxon.synonyms.is_empty() {
            println!("  no synonyms");
        } else {
            println!("  synonyms:");
            for synonym in &taxon.synonyms {
                println!(
                    "    [{}] {}",
                    synonym.id,
                    with_author(&synonym.name, synonym.author.as_deref())
                );
            }
        }
    });
    Ok(())
}

/// Every taxon as a "(Level) name" label, for pickers and scripts.
pub fn labels(helper: &SqlHelper, output: &OutputControls) -> Result<()> {
    let labels = helpers::taxon_labels(helper)?;
    output.show(&labels, |labels| {
        for label in labels {
            println!("{}", label);
        }
    });
    Ok(())
}

/// Add a taxon with optional synonyms.
pub fn add(helper: &SqlHelper, new: &NewTaxon, output: &OutputControls) -> Result<()> {
    let id = helpers::add_taxon(helper, new)
        .with_context(|| format!("Failed to add taxon {}", new.name))?;
    output.show(&json!({ "id": id, "name": new.name }), |_| {
        println!("Added taxon: {} (id {})", new.name, id);
    });
    Ok(())
}

/// Edit name, author or status of a taxon.
pub fn edit(helper: &SqlHelper, id: i64, edit: &TaxonEdit, output: &OutputControls) -> Result<()> {
    helpers::edit_taxon(helper, id, edit)
        .with_context(|| format!("Failed to edit taxon {}", id))?;
    output.show(&json!({ "id": id, "updated": true }), |_| {
        println!("Updated taxon {}", id);
    });
    Ok(())
}

/// Fuzzy search over taxon names and synonyms.
pub fn find(helper: &SqlHelper, query: &str, limit: usize, output: &OutputControls) -> Result<()> {
    let suggestions = helpers::suggest(helper, query, limit)?;
    output.show(&suggestions, |suggestions| {
        if suggestions.is_empty() {
            println!("No names resembling '{}'.", query);
            return;
        }
        for s in suggestions {
            println!("{:.2}  {} ({}, taxon {})", s.score, s.name, s.kind, s.taxon_id);
        }
    });
    Ok(())
}

fn summary_line(taxon: &Taxon) -> String {
    format!(
        "[{}] ({}) {} - {}",
        taxon.id,
        taxon.level,
        with_author(&taxon.name, taxon.author.as_deref()),
        taxon.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{quiet, seeded};
    use crate::taxa::CurationError;

    fn species(name: &str, parent: &str) -> NewTaxon {
        NewTaxon {
            name: name.to_string(),
            level: "Species".to_string(),
            parent: Some(parent.to_string()),
            ..Default::default()
        }
    }

    fn genus(name: &str) -> NewTaxon {
        NewTaxon {
            name: name.to_string(),
            level: "Genus".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_list_show() {
        let helper = seeded();
        add(&helper, &genus("Flavoparmelia"), &quiet()).unwrap();
        let caperata = species("Flavoparmelia caperata", "(Genus) Flavoparmelia");
        add(&helper, &caperata, &quiet()).unwrap();

        list(&helper, None, &quiet()).unwrap();
        list(&helper, Some("Species"), &quiet()).unwrap();
        labels(&helper, &quiet()).unwrap();
        show(&helper, "Flavoparmelia caperata", &quiet()).unwrap();

        let taxon = helpers::get_taxon(&helper, "Flavoparmelia caperata")
            .unwrap()
            .unwrap();
        assert_eq!(taxon.parent.as_deref(), Some("Flavoparmelia"));
    }

    #[test]
    fn test_add_duplicate_fails_with_context() {
        let helper = seeded();
        add(&helper, &genus("Hypogymnia"), &quiet()).unwrap();
        let err = add(&helper, &genus("Hypogymnia"), &quiet()).unwrap_err();
        assert!(err.to_string().contains("Failed to add taxon Hypogymnia"));
        assert!(matches!(
            err.downcast_ref::<CurationError>(),
            Some(CurationError::Duplicate { kind: "taxon", .. })
        ));
    }

    #[test]
    fn test_list_unknown_level_fails() {
        let helper = seeded();
        assert!(list(&helper, Some("Tribe"), &quiet()).is_err());
    }

    #[test]
    fn test_show_missing_name() {
        let helper = seeded();
        add(&helper, &genus("Lecanora"), &quiet()).unwrap();

        // JSON mode reports suggestions instead of failing.
        show(&helper, "Lecanor", &quiet()).unwrap();

        let text = OutputControls::default();
        assert!(show(&helper, "Lecanor", &text).is_ok());
        assert!(show(&helper, "Zzzz", &text).is_err());
    }

    #[test]
    fn test_edit_and_find() {
        let helper = seeded();
        add(&helper, &genus("Graphis"), &quiet()).unwrap();
        let id = helpers::get_taxon(&helper, "Graphis").unwrap().unwrap().id;

        let edit_names = TaxonEdit {
            local_name: Some("Schriftflechte".to_string()),
            ..Default::default()
        };
        edit(&helper, id, &edit_names, &quiet()).unwrap();
        assert!(edit(&helper, id, &TaxonEdit::default(), &quiet()).is_err());
        assert!(edit(&helper, id + 100, &edit_names, &quiet()).is_err());

        find(&helper, "Grafis", 5, &quiet()).unwrap();
        assert_eq!(
            helpers::get_taxon(&helper, "Graphis")
                .unwrap()
                .unwrap()
                .local_name
                .as_deref(),
            Some("Schriftflechte")
        );
    }

    #[test]
    fn test_summary_line() {
        let helper = seeded();
        add(
            &helper,
            &NewTaxon {
                author: Some("Ach.".to_string()),
                ..genus("Parmelia")
            },
            &quiet(),
        )
        .unwrap();
        let taxon = helpers::get_taxon(&helper, "Parmelia").unwrap().unwrap();
        assert_eq!(
            summary_line(&taxon),
            format!("[{}] (Genus) Parmelia Ach. - accepted", taxon.id)
        );
    }
}
