//! SQL queries for the curation layer.
//!
//! CHANGELOG:
//! - 10/18/2026 - English and local names on taxa
//! - 10/18/2026 - Initial query constants

/// Taxa with level, status and parent names resolved.
pub const TAXA: &str = r#"
SELECT
    t.id,
    t.name,
    t.author,
    l.name AS level,
    s.name AS status,
    p.name AS parent,
    t.english_name,
    t.local_name
FROM taxon t
JOIN taxon_level l ON t.level_id = l.id
JOIN taxon_status s ON t.status_id = s.id
LEFT JOIN taxon p ON t.parent_id = p.id
ORDER BY l.rank, t.name
"#;

/// Same as `TAXA`, restricted to one level name.
pub const TAXA_BY_LEVEL: &str = r#"
SELECT
    t.id,
    t.name,
    t.author,
    l.name AS level,
    s.name AS status,
    p.name AS parent,
    t.english_name,
    t.local_name
FROM taxon t
JOIN taxon_level l ON t.level_id = l.id
JOIN taxon_status s ON t.status_id = s.id
LEFT JOIN taxon p ON t.parent_id = p.id
WHERE l.name = ?1
ORDER BY t.name
"#;

/// One taxon by exact name.
pub const TAXON_BY_NAME: &str = r#"
SELECT
    t.id,
    t.name,
    t.author,
    l.name AS level,
    s.name AS status,
    p.name AS parent,
    t.english_name,
    t.local_name
FROM taxon t
JOIN taxon_level l ON t.level_id = l.id
JOIN taxon_status s ON t.status_id = s.id
LEFT JOIN taxon p ON t.parent_id = p.id
WHERE t.name = ?1
"#;

/// Synonyms of one taxon.
pub const SYNONYMS_OF: &str = r#"
SELECT id, taxon_id, name, author
FROM other_name
WHERE taxon_id = ?1
ORDER BY name
"#;

/// Every name a user might search for: taxa and their synonyms.
pub const ALL_NAMES: &str = r#"
SELECT name, 'taxon' AS kind, id AS taxon_id FROM taxon
UNION ALL
SELECT name, 'synonym' AS kind, taxon_id FROM other_name
"#;

pub const LEVELS: &str = r#"
SELECT id, name, rank FROM taxon_level ORDER BY rank
"#;
