//! JSON persistence for scheme stores.
//!
//! The on-disk format is a versioned envelope holding scheme records
//! (name, description, aliases, ordered reference list) followed by
//! mapping records (endpoint names plus ordered rules). References are
//! serialized as `"<book> <chapter>:<verse>"` strings.
//!
//! Loading validates everything: book identifiers, reference syntax,
//! scheme name references and mapping rule membership. A store that
//! loads is internally consistent; re-saving it reproduces the same
//! schemes and mappings in the same order.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::mapping::{MappingError, VersificationMapping};
use crate::core::reference::{Reference, ReferenceError};
use crate::core::scheme::{SchemeError, VersificationScheme};
use crate::store::set::{SchemeStore, StoreError};

/// Store format version for compatibility checking.
pub const STORE_VERSION: &str = "1.0.0";

#[derive(Error, Debug)]
pub enum StoreFormatError {
    #[error("Failed to read store: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse store: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("In {context}: {source}")]
    Reference {
        context: String,
        source: ReferenceError,
    },

    #[error("In mapping {mapping}: more than one rule for {reference}")]
    DuplicateRule {
        mapping: String,
        reference: Reference,
    },

    #[error(transparent)]
    Scheme(#[from] SchemeError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Serializable store envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreData {
    pub version: String,
    pub created_at: String,
    pub schemes: Vec<SchemeData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<MappingData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeData {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Ordered reference list; the order is the scheme's canonical order.
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingData {
    pub from: String,
    pub to: String,
    pub rules: Vec<RuleData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleData {
    pub from: String,
    pub to: Vec<String>,
}

fn parse_reference(input: &str, context: &str) -> Result<Reference, StoreFormatError> {
    input
        .parse()
        .map_err(|source| StoreFormatError::Reference {
            context: context.to_string(),
            source,
        })
}

impl SchemeStore {
    /// Load a store from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, StoreFormatError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a store from a JSON string, validating every record.
    pub fn from_json(json: &str) -> Result<Self, StoreFormatError> {
        let data: StoreData = serde_json::from_str(json)?;

        if data.version != STORE_VERSION {
            warn!(
                expected = STORE_VERSION,
                found = %data.version,
                "store version mismatch"
            );
        }

        let mut store = Self::new();
        for record in &data.schemes {
            let mut references = Vec::with_capacity(record.references.len());
            for input in &record.references {
                references.push(parse_reference(input, &format!("scheme {}", record.name))?);
            }
            let scheme = VersificationScheme::from_reference_list(
                record.name.clone(),
                record.description.clone(),
                record.aliases.clone(),
                references,
            )?;
            store.add_scheme(scheme)?;
        }

        for record in &data.mappings {
            let from = store.find_scheme(&record.from)?.clone();
            let to = store.find_scheme(&record.to)?.clone();
            let context = format!("mapping {}>{}", record.from, record.to);
            let mut rules: HashMap<Reference, Vec<Reference>> =
                HashMap::with_capacity(record.rules.len());
            for rule in &record.rules {
                let source = parse_reference(&rule.from, &context)?;
                let mut targets = Vec::with_capacity(rule.to.len());
                for target in &rule.to {
                    targets.push(parse_reference(target, &context)?);
                }
                if rules.insert(source.clone(), targets).is_some() {
                    return Err(StoreFormatError::DuplicateRule {
                        mapping: format!("{}>{}", record.from, record.to),
                        reference: source,
                    });
                }
            }
            let mapping = VersificationMapping::build(from, to, rules)?;
            store.add_mapping(mapping)?;
        }

        Ok(store)
    }

    /// Serialize the store to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, StoreFormatError> {
        let data = StoreData {
            version: STORE_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            schemes: self
                .schemes()
                .iter()
                .map(|scheme| SchemeData {
                    name: scheme.name().to_string(),
                    description: scheme.description().map(str::to_string),
                    aliases: scheme.aliases().to_vec(),
                    references: scheme.references().map(ToString::to_string).collect(),
                })
                .collect(),
            mappings: self
                .mappings()
                .iter()
                .map(|mapping| MappingData {
                    from: mapping.from_scheme().name().to_string(),
                    to: mapping.to_scheme().name().to_string(),
                    rules: mapping
                        .rules_in_order()
                        .map(|(source, targets)| RuleData {
                            from: source.to_string(),
                            to: targets.iter().map(ToString::to_string).collect(),
                        })
                        .collect(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Write the store to a JSON file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), StoreFormatError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> String {
        r#"{
            "version": "1.0.0",
            "created_at": "2024-01-01T00:00:00+00:00",
            "schemes": [
                {
                    "name": "A",
                    "description": "scheme A",
                    "references": ["Gen 1:1", "Gen 1:2", "Gen 1:3"]
                },
                {
                    "name": "B",
                    "aliases": ["Beta"],
                    "references": ["Gen 1:1/t", "Gen 1:1", "Gen 1:2"]
                }
            ],
            "mappings": [
                {
                    "from": "A",
                    "to": "B",
                    "rules": [
                        {"from": "Gen 1:1", "to": ["Gen 1:1/t", "Gen 1:1"]},
                        {"from": "Gen 1:2", "to": ["Gen 1:2"]}
                    ]
                }
            ]
        }"#
        .to_string()
    }

    #[test]
    fn test_load_valid_store() {
        let store = SchemeStore::from_json(&sample_json()).unwrap();
        assert_eq!(store.schemes().len(), 2);
        assert_eq!(store.mappings().len(), 1);

        let b = store.find_scheme("Beta").unwrap();
        assert_eq!(b.name(), "B");
        // Order preserved verbatim: title pseudo-verse first
        assert_eq!(b.reference(0).unwrap().to_string(), "Gen 1:1/t");

        let mapping = store.find_mapping("A/B").unwrap();
        assert_eq!(mapping.rule_count(), 2);
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let store = SchemeStore::from_json(&sample_json()).unwrap();
        let json = store.to_json().unwrap();
        let reloaded = SchemeStore::from_json(&json).unwrap();
        let json_again = reloaded.to_json().unwrap();

        // Identical apart from the created_at stamp
        let strip = |s: &str| {
            s.lines()
                .filter(|l| !l.contains("created_at"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_eq!(strip(&json), strip(&json_again));
    }

    #[test]
    fn test_load_rejects_unknown_scheme_in_mapping() {
        let json = r#"{
            "version": "1.0.0",
            "created_at": "",
            "schemes": [
                {"name": "A", "references": ["Gen 1:1"]}
            ],
            "mappings": [
                {"from": "A", "to": "Missing", "rules": []}
            ]
        }"#;
        assert!(matches!(
            SchemeStore::from_json(json),
            Err(StoreFormatError::Store(StoreError::UnknownScheme(_)))
        ));
    }

    #[test]
    fn test_load_rejects_unknown_book() {
        let json = r#"{
            "version": "1.0.0",
            "created_at": "",
            "schemes": [
                {"name": "A", "references": ["Atlantis 1:1"]}
            ]
        }"#;
        assert!(matches!(
            SchemeStore::from_json(json),
            Err(StoreFormatError::Reference { .. })
        ));
    }

    #[test]
    fn test_load_rejects_rule_outside_target_scheme() {
        let json = r#"{
            "version": "1.0.0",
            "created_at": "",
            "schemes": [
                {"name": "A", "references": ["Gen 1:1"]},
                {"name": "B", "references": ["Gen 1:1"]}
            ],
            "mappings": [
                {"from": "A", "to": "B", "rules": [
                    {"from": "Gen 1:1", "to": ["Gen 1:2"]}
                ]}
            ]
        }"#;
        assert!(matches!(
            SchemeStore::from_json(json),
            Err(StoreFormatError::Mapping(MappingError::UnknownTarget { .. }))
        ));
    }

    #[test]
    fn test_load_rejects_duplicate_rules() {
        let json = r#"{
            "version": "1.0.0",
            "created_at": "",
            "schemes": [
                {"name": "A", "references": ["Gen 1:1"]},
                {"name": "B", "references": ["Gen 1:1"]}
            ],
            "mappings": [
                {"from": "A", "to": "B", "rules": [
                    {"from": "Gen 1:1", "to": ["Gen 1:1"]},
                    {"from": "Gen 1:1", "to": ["Gen 1:1"]}
                ]}
            ]
        }"#;
        assert!(matches!(
            SchemeStore::from_json(json),
            Err(StoreFormatError::DuplicateRule { .. })
        ));
    }
}
