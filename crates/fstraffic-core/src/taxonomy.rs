// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::DataError;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Base aircraft naming data shipped with the crate.
const BASE_DATA: &str = include_str!("../data/aircraft-naming.json");

/// One search term of a type. Patterns are written as `/regex/` in the
/// data file; the delimiters are sniffed once here, at load time, and the
/// regex is compiled case-insensitive. Literals are stored lower-cased.
#[derive(Debug, Clone)]
pub enum MatchTerm {
    Literal(String),
    Pattern(Regex),
}

impl MatchTerm {
    fn parse(raw: &str, code: &str) -> Result<Self, DataError> {
        if raw.len() > 1 && raw.starts_with('/') && raw.ends_with('/') {
            let pattern = &raw[1..raw.len() - 1];
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| DataError::BadPattern {
                    code: code.to_string(),
                    pattern: pattern.to_string(),
                    source,
                })?;
            Ok(MatchTerm::Pattern(regex))
        } else {
            Ok(MatchTerm::Literal(raw.to_lowercase()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Canonical ICAO type designator, unique across the taxonomy.
    pub code: String,
    pub name: Option<String>,
    pub series: Option<String>,
    /// Ordered; position is the tie-break priority.
    pub match_terms: Vec<MatchTerm>,
}

#[derive(Debug, Clone)]
pub struct Manufacturer {
    pub name: String,
    /// Lower-cased literal name fragments. A title that contains none of
    /// these never descends into this manufacturer's types.
    pub match_names: Vec<String>,
    pub types: Vec<TypeDef>,
}

#[derive(Debug, Clone)]
pub struct Taxonomy {
    /// Ordered as in the data file; order is match priority.
    pub manufacturers: Vec<Manufacturer>,
    /// Ordered code list used for the spreadsheet row export.
    pub canonical_codes: Vec<String>,
}

impl Taxonomy {
    /// Loads the bundled naming data.
    pub fn bundled() -> Result<Self, DataError> {
        let value: Value = serde_json::from_str(BASE_DATA)
            .map_err(|e| DataError::Parse(format!("Bundled aircraft data: {}", e)))?;
        Self::from_value(&value)
    }

    /// Loads the bundled data, deep-merged with an optional user override
    /// file. See [`merge_override`] for the merge policy.
    pub fn load<P: AsRef<Path>>(override_path: Option<P>) -> Result<Self, DataError> {
        let mut base: Value = serde_json::from_str(BASE_DATA)
            .map_err(|e| DataError::Parse(format!("Bundled aircraft data: {}", e)))?;

        if let Some(path) = override_path {
            let content = fs::read_to_string(path)?;
            let user: Value = serde_json::from_str(&content)
                .map_err(|e| DataError::Parse(format!("Custom aircraft data: {}", e)))?;

            if user.get("list").is_none() && user.get("types").is_none() {
                return Err(DataError::InvalidOverride);
            }

            merge_override(&mut base, user);
        }

        Self::from_value(&base)
    }

    /// Builds the typed taxonomy from the (merged) JSON tree, validating
    /// shape, pattern syntax, and code uniqueness up front so that
    /// classification never has to.
    pub fn from_value(value: &Value) -> Result<Self, DataError> {
        let canonical_codes = match value.get("list") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| DataError::Parse("\"list\" must contain strings".into()))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(DataError::Parse("\"list\" must be an array".into())),
            None => Vec::new(),
        };

        let types = value
            .get("types")
            .and_then(Value::as_object)
            .ok_or_else(|| DataError::Parse("\"types\" section missing or not an object".into()))?;

        let mut manufacturers = Vec::with_capacity(types.len());
        let mut seen_codes: Vec<String> = Vec::new();

        for (manufacturer_name, manufacturer_value) in types {
            let match_names = string_array(manufacturer_value.get("search"), || {
                format!("manufacturer {}: \"search\"", manufacturer_name)
            })?
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect();

            let type_map = manufacturer_value
                .get("types")
                .and_then(Value::as_object)
                .ok_or_else(|| {
                    DataError::Parse(format!(
                        "manufacturer {}: \"types\" missing or not an object",
                        manufacturer_name
                    ))
                })?;

            let mut type_defs = Vec::with_capacity(type_map.len());
            for (code, type_value) in type_map {
                if seen_codes.contains(code) {
                    return Err(DataError::DuplicateTypeCode(code.clone()));
                }
                seen_codes.push(code.clone());

                let raw_terms = string_array(type_value.get("search"), || {
                    format!("type {}: \"search\"", code)
                })?;
                let match_terms = raw_terms
                    .iter()
                    .map(|raw| MatchTerm::parse(raw, code))
                    .collect::<Result<Vec<_>, _>>()?;

                type_defs.push(TypeDef {
                    code: code.clone(),
                    name: type_value
                        .get("name")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    series: type_value
                        .get("series")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    match_terms,
                });
            }

            manufacturers.push(Manufacturer {
                name: manufacturer_name.clone(),
                match_names,
                types: type_defs,
            });
        }

        Ok(Self {
            manufacturers,
            canonical_codes,
        })
    }
}

fn string_array(value: Option<&Value>, what: impl Fn() -> String) -> Result<Vec<String>, DataError> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| DataError::Parse(format!("{} must contain strings", what())))
            })
            .collect(),
        Some(_) => Err(DataError::Parse(format!("{} must be an array", what()))),
        None => Err(DataError::Parse(format!("{} is missing", what()))),
    }
}

/// Merge policy: objects deep-merge by key (override keys not in the base
/// are appended, preserving override order); arrays concatenate
/// base-then-override with case-insensitive dedupe; scalars are replaced
/// by the override. Overrides can add and extend, never remove.
pub fn merge_override(base: &mut Value, user: Value) {
    match (base, user) {
        (Value::Object(base_map), Value::Object(user_map)) => {
            for (key, user_value) in user_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => merge_override(base_value, user_value),
                    None => {
                        base_map.insert(key, user_value);
                    }
                }
            }
        }
        (Value::Array(base_items), Value::Array(user_items)) => {
            for item in user_items {
                let duplicate = base_items.iter().any(|existing| {
                    match (existing.as_str(), item.as_str()) {
                        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                        _ => existing == &item,
                    }
                });
                if !duplicate {
                    base_items.push(item);
                }
            }
        }
        (base_slot, user_value) => *base_slot = user_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bundled_data_loads() {
        let taxonomy = Taxonomy::bundled().unwrap();

        assert!(!taxonomy.manufacturers.is_empty());
        assert!(taxonomy.canonical_codes.iter().any(|c| c == "B738"));

        let boeing = taxonomy
            .manufacturers
            .iter()
            .find(|m| m.name == "Boeing")
            .expect("Boeing must exist in bundled data");
        assert!(boeing.match_names.contains(&"boeing".to_string()));
        assert!(boeing.types.iter().any(|t| t.code == "B738"));
    }

    #[test]
    fn test_pattern_terms_compiled_at_load() {
        let value = json!({
            "types": {
                "Airbus": {
                    "search": ["airbus"],
                    "types": {
                        "A320": { "search": ["/a3[12]0/"] }
                    }
                }
            }
        });
        let taxonomy = Taxonomy::from_value(&value).unwrap();
        let term = &taxonomy.manufacturers[0].types[0].match_terms[0];

        match term {
            MatchTerm::Pattern(re) => {
                assert!(re.is_match("Airbus A310"));
                assert!(re.is_match("airbus a320 something"));
                assert!(!re.is_match("Airbus A330"));
            }
            MatchTerm::Literal(_) => panic!("expected a pattern term"),
        }
    }

    #[test]
    fn test_bad_pattern_is_load_error() {
        let value = json!({
            "types": {
                "Airbus": {
                    "search": ["airbus"],
                    "types": {
                        "A320": { "search": ["/a3[12/"] }
                    }
                }
            }
        });
        let err = Taxonomy::from_value(&value).unwrap_err();
        assert!(matches!(err, DataError::BadPattern { .. }));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let value = json!({
            "types": {
                "Airbus": {
                    "search": ["airbus"],
                    "types": { "A320": { "search": ["a320"] } }
                },
                "Airbus Clone": {
                    "search": ["clone"],
                    "types": { "A320": { "search": ["a320clone"] } }
                }
            }
        });
        let err = Taxonomy::from_value(&value).unwrap_err();
        assert!(matches!(err, DataError::DuplicateTypeCode(code) if code == "A320"));
    }

    #[test]
    fn test_merge_appends_and_dedupes_terms() {
        let mut base = json!({
            "list": ["A320"],
            "types": {
                "Airbus": {
                    "search": ["airbus"],
                    "types": {
                        "A320": { "name": "A320", "search": ["a320"] }
                    }
                }
            }
        });
        let user = json!({
            "types": {
                "Airbus": {
                    "search": ["AIRBUS", "aib"],
                    "types": {
                        "A320": { "search": ["a320neo"] },
                        "A321": { "search": ["a321"] }
                    }
                },
                "Tupolev": {
                    "search": ["tupolev"],
                    "types": { "T154": { "search": ["154"] } }
                }
            }
        });
        merge_override(&mut base, user);

        let airbus = &base["types"]["Airbus"];
        // "AIRBUS" collapses into the existing "airbus", "aib" is appended
        assert_eq!(airbus["search"], json!(["airbus", "aib"]));
        // term arrays extend, base name survives
        assert_eq!(airbus["types"]["A320"]["search"], json!(["a320", "a320neo"]));
        assert_eq!(airbus["types"]["A320"]["name"], json!("A320"));
        // new type and new manufacturer appended after the base entries
        assert!(airbus["types"]["A321"].is_object());
        let manufacturers: Vec<&String> = base["types"].as_object().unwrap().keys().collect();
        assert_eq!(manufacturers, ["Airbus", "Tupolev"]);
    }

    #[test]
    fn test_override_without_sections_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{ "something": 1 }"#).unwrap();

        let err = Taxonomy::load(Some(&path)).unwrap_err();
        assert!(matches!(err, DataError::InvalidOverride));
    }

    #[test]
    fn test_override_file_merges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(
            &path,
            r#"{ "types": { "Tupolev": { "search": ["tupolev", "tu-"], "types": { "T154": { "name": "Tu-154", "search": ["154"] } } } } }"#,
        )
        .unwrap();

        let taxonomy = Taxonomy::load(Some(&path)).unwrap();
        let tupolev = taxonomy
            .manufacturers
            .iter()
            .find(|m| m.name == "Tupolev")
            .expect("override manufacturer must be appended");
        assert_eq!(tupolev.types[0].code, "T154");
        assert_eq!(tupolev.types[0].name.as_deref(), Some("Tu-154"));
        // base entries are still there, ahead of the override
        assert_eq!(taxonomy.manufacturers[0].name, "Airbus");
    }
}
