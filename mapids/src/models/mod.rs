//! Domain models for identifier remapping.
//!
//! - [`MappingEntry`] - canonical `{ id, name }` pair for one source identifier
//! - [`Lookup`] - get-or-default view of a mapping lookup

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Mapping Entry
// =============================================================================

/// Canonical identity a source identifier maps to.
///
/// Both attributes are required. Numbers in the document are accepted and
/// kept as their JSON text, so `{"id": 100}` maps to `"100"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Canonical identifier.
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,
}

impl MappingEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Lookup
// =============================================================================

/// Result of looking a key up in the mapping table.
///
/// An absent key gives `Lookup::default()`, whose accessors hand back the
/// caller's raw value instead of a blank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lookup<'a> {
    pub id: Option<&'a str>,
    pub name: Option<&'a str>,
}

impl<'a> Lookup<'a> {
    /// Mapped id, or `raw` when unmapped.
    pub fn id_or(&self, raw: &'a str) -> &'a str {
        self.id.unwrap_or(raw)
    }

    /// Mapped name, or `raw` when unmapped.
    pub fn name_or(&self, raw: &'a str) -> &'a str {
        self.name.unwrap_or(raw)
    }

    pub fn is_mapped(&self) -> bool {
        self.id.is_some()
    }
}

impl<'a> From<&'a MappingEntry> for Lookup<'a> {
    fn from(entry: &'a MappingEntry) -> Self {
        Self {
            id: Some(&entry.id),
            name: Some(&entry.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_strings() {
        let entry: MappingEntry = serde_json::from_str(r#"{"id": "100", "name": "Alice"}"#).unwrap();
        assert_eq!(entry, MappingEntry::new("100", "Alice"));
    }

    #[test]
    fn test_entry_numeric_id() {
        let entry: MappingEntry = serde_json::from_str(r#"{"id": 100, "name": "Alice"}"#).unwrap();
        assert_eq!(entry.id, "100");
    }

    #[test]
    fn test_entry_extra_attributes_ignored() {
        let entry: MappingEntry =
            serde_json::from_str(r#"{"id": "7", "name": "Bob", "email": "bob@example.org"}"#).unwrap();
        assert_eq!(entry.name, "Bob");
    }

    #[test]
    fn test_entry_rejects_null_and_missing() {
        assert!(serde_json::from_str::<MappingEntry>(r#"{"id": null, "name": "x"}"#).is_err());
        assert!(serde_json::from_str::<MappingEntry>(r#"{"id": "1"}"#).is_err());
        let err = serde_json::from_str::<MappingEntry>(r#"{"id": [1], "name": "x"}"#).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_default_lookup_passes_through() {
        let lookup = Lookup::default();
        assert!(!lookup.is_mapped());
        assert_eq!(lookup.id_or("u9"), "u9");
        assert_eq!(lookup.name_or("u9"), "u9");
    }

    #[test]
    fn test_entry_lookup() {
        let entry = MappingEntry::new("100", "Alice");
        let lookup = Lookup::from(&entry);
        assert!(lookup.is_mapped());
        assert_eq!(lookup.id_or("u1"), "100");
        assert_eq!(lookup.name_or("u1"), "Alice");
    }
}
