use std::collections::HashMap;
use chrono::NaiveDateTime;
use serde::{Serialize, Deserialize};
use crate::core::types::DocId;

/// One metadata block of a document. A doc id that spans several CSV rows
/// carries one block per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMeta {
    pub title: String,
    pub date_posted: NaiveDateTime,
    pub court: String,
}

/// Metadata, cosine length and feedback vector of one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocEntry {
    pub data: Vec<DocMeta>,           // one block per CSV row under this doc id
    pub length: f64,                  // Euclidean norm of the log-tf vector
    pub vector: HashMap<String, f64>, // top-k tf-idf terms, for feedback centroids
}

impl DocEntry {
    pub fn add_meta(&mut self, meta: DocMeta) {
        self.data.push(meta);
    }

    pub fn titles(&self) -> Vec<&str> {
        self.data.iter().map(|meta| meta.title.as_str()).collect()
    }

    /// Merges per-row vector contributions; rows sharing a doc id sum.
    pub fn update_vector(&mut self, vector: HashMap<String, f64>) {
        for (term, weight) in vector {
            *self.vector.entry(term).or_insert(0.0) += weight;
        }
    }

    /// The stored vector scaled down by the stored length; empty for a
    /// document that indexed no terms.
    pub fn normalized_vector(&self) -> HashMap<String, f64> {
        if self.length == 0.0 {
            return HashMap::new();
        }
        self.vector
            .iter()
            .map(|(term, weight)| (term.clone(), weight / self.length))
            .collect()
    }
}

/// Document store keyed by doc id, loaded whole at query time.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DocumentStore {
    pub documents: HashMap<DocId, DocEntry>,
}

impl DocumentStore {
    pub fn new() -> Self {
        DocumentStore {
            documents: HashMap::new(),
        }
    }

    pub fn get(&self, doc_id: DocId) -> Option<&DocEntry> {
        self.documents.get(&doc_id)
    }

    pub fn get_or_insert(&mut self, doc_id: DocId) -> &mut DocEntry {
        self.documents.entry(doc_id).or_default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
