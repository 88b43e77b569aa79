use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use crate::core::error::{Error, ErrorKind, Result};

/// Synonym lookup capability for lexical query expansion.
pub trait SynonymSource {
    fn synonyms(&self, term: &str) -> HashSet<String>;
}

/// Table-driven synonym source.
///
/// The JSON file maps each term to a list of synonyms:
/// `{ "lawyer": ["attorney", "counsel"], ... }`. Keys and values should be
/// pre-stemmed with the same analyzer that built the index.
pub struct StaticSynonyms {
    pub table: HashMap<String, HashSet<String>>,
}

impl StaticSynonyms {
    pub fn new(table: HashMap<String, HashSet<String>>) -> Self {
        StaticSynonyms { table }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let table: HashMap<String, HashSet<String>> = serde_json::from_str(&raw)
            .map_err(|e| {
                Error::new(
                    ErrorKind::Format,
                    format!("invalid synonym table {}: {}", path.display(), e),
                )
            })?;
        Ok(StaticSynonyms { table })
    }
}

impl SynonymSource for StaticSynonyms {
    fn synonyms(&self, term: &str) -> HashSet<String> {
        self.table.get(term).cloned().unwrap_or_default()
    }
}
