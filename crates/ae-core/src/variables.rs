use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AdventureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    String,
    Number,
    Bool,
}

impl VariableKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "bool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableEntry {
    pub kind: VariableKind,
    pub data: String,
}

impl VariableEntry {
    pub fn parses_as_declared(&self) -> bool {
        match self.kind {
            VariableKind::String => true,
            VariableKind::Number => self.data.parse::<f64>().is_ok(),
            VariableKind::Bool => self.data.parse::<bool>().is_ok(),
        }
    }
}

/// Formats numbers the way the store encodes them: integral values lose the
/// fractional suffix so `1.0` and `1` serialize identically.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Process-wide typed key/value mapping backing conditions and mutations.
///
/// Keys are upper-cased on every access, so two keys differing only in case
/// collide. Reads never fail: a missing or unparseable entry yields the
/// kind's zero value. Validation of stored data happens offline in ae-tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableStore {
    entries: BTreeMap<String, VariableEntry>,
}

fn fold_key(key: &str) -> String {
    key.to_uppercase()
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: &str, kind: VariableKind) {
        self.entries.insert(
            fold_key(key),
            VariableEntry {
                kind,
                data: value.to_string(),
            },
        );
    }

    pub fn set_text(&mut self, key: &str, value: &str) {
        self.set(key, value, VariableKind::String);
    }

    pub fn set_number(&mut self, key: &str, value: f64) {
        self.set(key, &format_number(value), VariableKind::Number);
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, if value { "true" } else { "false" }, VariableKind::Bool);
    }

    pub fn set_entry(&mut self, key: &str, entry: VariableEntry) {
        self.entries.insert(fold_key(key), entry);
    }

    pub fn entry(&self, key: &str) -> Option<&VariableEntry> {
        self.entries.get(&fold_key(key))
    }

    pub fn text(&self, key: &str) -> String {
        self.entry(key)
            .map(|entry| entry.data.clone())
            .unwrap_or_default()
    }

    pub fn number(&self, key: &str) -> f64 {
        self.entry(key)
            .and_then(|entry| entry.data.parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    pub fn bool(&self, key: &str) -> bool {
        self.entry(key)
            .and_then(|entry| entry.data.parse::<bool>().ok())
            .unwrap_or(false)
    }

    pub fn kind(&self, key: &str) -> Option<VariableKind> {
        self.entry(key).map(|entry| entry.kind)
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(&fold_key(key))
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.remove(&fold_key(key));
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VariableEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn serialize(&self) -> String {
        serde_json::to_string(self).expect("variable store should serialize")
    }

    pub fn deserialize(text: &str) -> Result<Self, AdventureError> {
        serde_json::from_str(text).map_err(|error| {
            AdventureError::new(
                "VARIABLES_PARSE",
                format!("Variable set is not valid JSON: {}", error),
            )
        })
    }
}
