//! Fuzzy matching of scientific names using strsim.
//!
//! Names are compared case-insensitively with several strategies and the
//! best score wins. Abbreviated genera ("P. sulcata") are expanded against
//! the candidate's genus before scoring.
//!
//! CHANGELOG:
//! - 10/18/2026 - Genus abbreviation strategy
//! - 10/18/2026 - Initial multi-strategy scoring

use strsim::{jaro_winkler, normalized_levenshtein, sorensen_dice};

/// Minimum score for a fuzzy suggestion (0.0 - 1.0).
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// Result of matching a query against one candidate name.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub score: f64,
    pub strategy: &'static str,
}

/// Score `candidate` against `query`.
///
/// Exact matches score 1.0 and substring matches 0.9; anything else takes
/// the best of the string-distance strategies.
pub fn score(query: &str, candidate: &str) -> NameMatch {
    let query = normalize(query);
    let candidate = normalize(candidate);

    if query == candidate {
        return NameMatch {
            score: 1.0,
            strategy: "exact",
        };
    }
    if !query.is_empty() && candidate.contains(&query) {
        return NameMatch {
            score: 0.9,
            strategy: "partial",
        };
    }

    let mut strategies = vec![
        ("jaro_winkler", jaro_winkler(&query, &candidate)),
        ("sorensen_dice", sorensen_dice(&query, &candidate)),
        ("levenshtein", normalized_levenshtein(&query, &candidate)),
    ];
    if let Some(expanded) = expand_genus(&query, &candidate) {
        strategies.push(("abbreviated_genus", jaro_winkler(&expanded, &candidate)));
    }

    strategies
        .into_iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(strategy, score)| NameMatch { score, strategy })
        .unwrap_or(NameMatch {
            score: 0.0,
            strategy: "none",
        })
}

/// Lowercase and collapse whitespace.
fn normalize(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// "p. sulcata" against "parmelia sulcata" becomes "parmelia sulcata".
fn expand_genus(query: &str, candidate: &str) -> Option<String> {
    let (abbrev, rest) = query.split_once(' ')?;
    let initial = abbrev.strip_suffix('.')?;
    let (genus, _) = candidate.split_once(' ')?;
    if initial.is_empty() || !genus.starts_with(initial) {
        return None;
    }
    Some(format!("{} {}", genus, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_partial() {
        assert_eq!(score("Parmelia  Sulcata", "parmelia sulcata").strategy, "exact");
        let partial = score("sulcata", "Parmelia sulcata");
        assert_eq!(partial.strategy, "partial");
        assert!(partial.score >= DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_misspelling_scores_high() {
        let m = score("Xanthoria parietna", "Xanthoria parietina");
        assert!(m.score >= DEFAULT_THRESHOLD, "{:?}", m);
    }

    #[test]
    fn test_unrelated_scores_low() {
        let m = score("Usnea", "Peltigera canina");
        assert!(m.score < DEFAULT_THRESHOLD, "{:?}", m);
    }

    #[test]
    fn test_abbreviated_genus() {
        assert_eq!(
            expand_genus("p. sulcata", "parmelia sulcata"),
            Some("parmelia sulcata".to_string())
        );
        assert_eq!(expand_genus("x. sulcata", "parmelia sulcata"), None);
        assert_eq!(expand_genus("parmelia", "parmelia sulcata"), None);

        let m = score("P. sulcata", "Parmelia sulcata");
        assert_eq!(m.strategy, "abbreviated_genus");
        assert!((m.score - 1.0).abs() < f64::EPSILON);
    }
}
