//! Mapping Table - canonical identities keyed by source identifier
//!
//! Loaded once from a JSON object of the form
//! `{ "<source id>": { "id": "...", "name": "..." }, ... }` and read-only
//! afterwards.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{MappingError, MappingResult};
use crate::models::{Lookup, MappingEntry};

/// In-memory mapping from source identifier to canonical entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: HashMap<String, MappingEntry>,
}

impl MappingTable {
    /// Build a table from already-parsed entries
    pub fn new(entries: HashMap<String, MappingEntry>) -> Self {
        Self { entries }
    }

    /// Parse a mapping document
    pub fn from_json(content: &str) -> MappingResult<Self> {
        let entries: HashMap<String, MappingEntry> = serde_json::from_str(content)?;
        Ok(Self::new(entries))
    }

    /// Load the mapping document at `path`
    pub fn load(path: impl AsRef<Path>) -> MappingResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MappingError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let entries: HashMap<String, MappingEntry> =
            serde_json::from_str(&content).map_err(|source| MappingError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::new(entries))
    }

    /// Get-or-default lookup: unknown keys give an empty [`Lookup`]
    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        self.entries.get(key).map(Lookup::from).unwrap_or_default()
    }

    /// Get an entry by source identifier
    pub fn get(&self, key: &str) -> Option<&MappingEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(source id, entry)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappingEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, MappingEntry)> for MappingTable {
    fn from_iter<T: IntoIterator<Item = (String, MappingEntry)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
