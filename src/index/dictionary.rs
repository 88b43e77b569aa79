use std::collections::HashMap;
use serde::{Serialize, Deserialize};

/// Per-term statistics and postings-file location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    pub doc_frequency: u64, // distinct documents containing the term
    pub offset: u64,        // byte offset of the term's postings line
}

/// Term dictionary, loaded whole into memory at query time.
///
/// During building, the postings line assigned to each term lives in a
/// companion map on the indexer; only the frozen fields are persisted.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Dictionary {
    pub terms: HashMap<String, TermEntry>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary {
            terms: HashMap::new(),
        }
    }

    pub fn get(&self, term: &str) -> Option<&TermEntry> {
        self.terms.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
