//! Name → effect-definition lookup table.

use std::collections::HashMap;

use serde_json::Value;

use super::EffectDefinition;
use crate::error::DomainError;

/// Normalize a rule element name for lookup.
///
/// Lowercases, drops apostrophes and collapses every other run of
/// non-alphanumeric characters to a single `_` ("Bull's Strength" →
/// "bulls_strength", "Skill Focus (Perception)" → "skill_focus_perception").
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.trim().chars() {
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if c.is_alphanumeric() {
            if pending_separator && !normalized.is_empty() {
                normalized.push('_');
            }
            pending_separator = false;
            normalized.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    normalized
}

/// Externally supplied game content: element name → ordered definitions.
#[derive(Debug, Clone, Default)]
pub struct RulesTable {
    entries: HashMap<String, Vec<EffectDefinition>>,
}

impl RulesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the definitions for an element name.
    pub fn insert(&mut self, name: &str, definitions: Vec<EffectDefinition>) {
        self.entries.insert(normalize_name(name), definitions);
    }

    pub fn with(mut self, name: &str, definitions: Vec<EffectDefinition>) -> Self {
        self.insert(name, definitions);
        self
    }

    /// Definitions for an element, looked up by normalized name.
    pub fn get(&self, name: &str) -> Option<&[EffectDefinition]> {
        self.entries.get(&normalize_name(name)).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON document of the form `{ "Power Attack": [ {...}, ... ] }`.
    ///
    /// A document that is not an object is an error. Inside it, an element
    /// whose entry is not an array, or a definition whose value does not fit
    /// its declared kind, is logged and skipped.
    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        let document: Value = serde_json::from_str(json)?;
        Self::from_json_value(document)
    }

    pub fn from_json_value(document: Value) -> Result<Self, DomainError> {
        let Value::Object(elements) = document else {
            return Err(DomainError::rules_table(
                "rules table must be a JSON object keyed by element name",
            ));
        };

        let mut table = RulesTable::new();
        for (name, raw_definitions) in elements {
            let Value::Array(items) = raw_definitions else {
                tracing::warn!(element = %name, "Rules table entry is not a list, skipping");
                continue;
            };

            let mut definitions = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                match serde_json::from_value::<EffectDefinition>(item) {
                    Ok(definition) => definitions.push(definition),
                    Err(error) => {
                        tracing::warn!(
                            element = %name,
                            index,
                            error = %error,
                            "Invalid effect definition shape, skipping"
                        );
                    }
                }
            }
            table.insert(&name, definitions);
        }

        Ok(table)
    }
}
