//! Output formatting for command results.
//!
//! `--json` prints results as JSON; `--fields` narrows them to a list of
//! field paths where `synonyms.name` reaches into nested records.
//!
//! CHANGELOG:
//! - 10/18/2026 - Nested field paths, error cause chain in JSON errors
//! - 10/18/2026 - JSON output controls for curation commands

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Output control settings from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct OutputControls {
    pub json: bool,
    pub compact: bool,
    pub fields: Option<String>,
}

impl OutputControls {
    /// Render data as JSON according to the controls.
    pub fn emit<T: Serialize>(&self, data: &T) -> String {
        let value = serde_json::to_value(data).unwrap_or(Value::Null);
        let value = match self.fields.as_deref() {
            Some(fields) => FieldPaths::parse(fields).apply(&value),
            None => value,
        };
        render(&value, self.compact)
    }

    /// Print JSON to stdout.
    pub fn print<T: Serialize>(&self, data: &T) {
        println!("{}", self.emit(data));
    }

    /// Print `data` as JSON when `--json` is set, otherwise run `text`.
    pub fn show<T: Serialize>(&self, data: &T, text: impl FnOnce(&T)) {
        if self.json {
            self.print(data);
        } else {
            text(data);
        }
    }
}

fn render(value: &Value, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.unwrap_or_else(|_| "null".to_string())
}

/// Parsed `--fields` list: `id,name,synonyms.name`.
#[derive(Debug, Default, PartialEq)]
struct FieldPaths {
    /// A path ends here, so the value is kept as is.
    whole: bool,
    fields: Vec<(String, FieldPaths)>,
}

impl FieldPaths {
    fn parse(spec: &str) -> Self {
        let mut paths = FieldPaths::default();
        for path in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            paths.insert(path.split('.').map(str::trim));
        }
        paths
    }

    fn insert<'a>(&mut self, mut parts: impl Iterator<Item = &'a str>) {
        let Some(head) = parts.next() else {
            self.whole = true;
            return;
        };
        let index = match self.fields.iter().position(|(name, _)| name == head) {
            Some(i) => i,
            None => {
                self.fields.push((head.to_string(), FieldPaths::default()));
                self.fields.len() - 1
            }
        };
        self.fields[index].1.insert(parts);
    }

    /// Keep only the listed paths, applied to every element of arrays.
    fn apply(&self, value: &Value) -> Value {
        if self.whole {
            return value.clone();
        }
        match value {
            Value::Array(items) => Value::Array(items.iter().map(|v| self.apply(v)).collect()),
            Value::Object(map) => {
                let mut kept = Map::new();
                for (name, sub) in &self.fields {
                    if let Some(v) = map.get(name) {
                        kept.insert(name.clone(), sub.apply(v));
                    }
                }
                Value::Object(kept)
            }
            other => other.clone(),
        }
    }
}

/// JSON error report: the outermost message plus the chain of causes.
pub fn format_error(error: &anyhow::Error) -> String {
    let causes: Vec<String> = error.chain().skip(1).map(|c| c.to_string()).collect();
    render(
        &json!({
            "success": false,
            "error": error.to_string(),
            "causes": causes,
        }),
        true,
    )
}

/// Render an optional author after a name: `Parmelia Ach.`.
pub fn with_author(name: &str, author: Option<&str>) -> String {
    match author {
        Some(a) if !a.is_empty() => format!("{} {}", name, a),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn compact(fields: &str) -> OutputControls {
        OutputControls {
            json: true,
            compact: true,
            fields: Some(fields.to_string()),
        }
    }

    #[test]
    fn test_top_level_fields() {
        let data = json!([{"id": 1, "name": "bark", "extra": true}]);
        assert_eq!(compact("id, name").emit(&data), r#"[{"id":1,"name":"bark"}]"#);
    }

    #[test]
    fn test_nested_field_paths() {
        let data = json!({
            "id": 7,
            "name": "Xanthoria parietina",
            "synonyms": [
                {"id": 1, "name": "Parmelia parietina", "author": "Ach."},
                {"id": 2, "name": "Lichen parietinus", "author": "L."}
            ]
        });
        assert_eq!(
            compact("name,synonyms.name").emit(&data),
            r#"{"name":"Xanthoria parietina","synonyms":[{"name":"Parmelia parietina"},{"name":"Lichen parietinus"}]}"#
        );
        // A bare field wins over a narrower path to the same field.
        assert_eq!(
            FieldPaths::parse("synonyms.name,synonyms").apply(&data)["synonyms"][0]["author"],
            "Ach."
        );
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let data = json!({"id": 1});
        assert_eq!(compact("rank,,").emit(&data), "{}");
    }

    #[test]
    fn test_format_error_with_causes() {
        let err = Err::<(), _>(std::io::Error::other("disk full"))
            .context("Failed to write backup")
            .unwrap_err();
        let out: Value = serde_json::from_str(&format_error(&err)).unwrap();
        assert_eq!(out["error"], "Failed to write backup");
        assert_eq!(out["causes"], json!(["disk full"]));
        assert_eq!(out["success"], false);
    }

    #[test]
    fn test_with_author() {
        assert_eq!(with_author("Parmelia", Some("Ach.")), "Parmelia Ach.");
        assert_eq!(with_author("Parmelia", None), "Parmelia");
        assert_eq!(with_author("Parmelia", Some("")), "Parmelia");
    }
}
