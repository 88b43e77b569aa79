use std::collections::HashMap;
use std::path::PathBuf;
use log::info;
use crate::analysis::analyzer::{Analyzer, has_any_alphanumeric};
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;
use crate::core::utils::{idf, log_tf};
use crate::corpus::record::{Record, RecordSource};
use crate::index::dictionary::Dictionary;
use crate::index::document::{DocMeta, DocumentStore};
use crate::index::posting::{Posting, PostingsList};
use crate::storage::{persist, postings_file};

/// Bulk indexer: consumes a record stream and produces the three
/// persistent artifacts (postings file, dictionary file, document file).
///
/// Building is two passes. The first pass accumulates postings, document
/// frequencies and cosine lengths, then flushes the postings file and
/// resolves each term's byte offset. The second pass derives per-document
/// top-k tf-idf vectors for relevance feedback. On any error the
/// partially written files must be considered corrupt.
pub struct Indexer<'a> {
    pub analyzer: &'a Analyzer,
    pub config: Config,
    pub postings_path: PathBuf,
    pub dictionary_path: PathBuf,
    pub document_path: PathBuf,
    dictionary: Dictionary,
    documents: DocumentStore,
    postings: HashMap<String, PostingsList>,
    // build state, dropped before persistence
    term_lines: HashMap<String, usize>,
    word_counts: HashMap<DocId, u32>,
}

impl<'a> Indexer<'a> {
    pub fn new(
        analyzer: &'a Analyzer,
        config: Config,
        postings_path: impl Into<PathBuf>,
        dictionary_path: impl Into<PathBuf>,
        document_path: impl Into<PathBuf>,
    ) -> Self {
        Indexer {
            analyzer,
            config,
            postings_path: postings_path.into(),
            dictionary_path: dictionary_path.into(),
            document_path: document_path.into(),
            dictionary: Dictionary::new(),
            documents: DocumentStore::new(),
            postings: HashMap::new(),
            term_lines: HashMap::new(),
            word_counts: HashMap::new(),
        }
    }

    /// Runs the full build. `limit` stops each pass after the first N
    /// records; `None` indexes everything.
    pub fn index(&mut self, source: &mut dyn RecordSource, limit: Option<usize>) -> Result<()> {
        let mut seen = 0usize;
        for record in source.records()? {
            if limit.is_some_and(|n| seen == n) {
                break;
            }
            let record = record?;
            self.index_record(&record);
            seen += 1;
        }
        info!(
            "first pass done: {} records, {} terms, {} documents",
            seen,
            self.dictionary.len(),
            self.documents.len()
        );

        for doc in self.documents.documents.values_mut() {
            doc.length = doc.length.sqrt();
        }
        self.word_counts.clear();

        self.flush_postings()?;
        self.assign_offsets()?;
        self.build_vectors(source, limit)?;
        self.persist()?;
        Ok(())
    }

    /// First-pass handling of one record: metadata, positions, postings,
    /// document frequencies and the squared-length accumulator.
    fn index_record(&mut self, record: &Record) {
        let doc = self.documents.get_or_insert(record.doc_id);
        doc.add_meta(DocMeta {
            title: record.title.clone(),
            date_posted: record.date_posted,
            court: record.court.clone(),
        });

        // positions continue where this doc's previous row stopped
        let offset = *self.word_counts.get(&record.doc_id).unwrap_or(&0);
        let tokens = self.analyzer.tokenize(&record.content);

        let mut term_positions: HashMap<String, Vec<u32>> = HashMap::new();
        for token in &tokens {
            if has_any_alphanumeric(&token.text) {
                term_positions
                    .entry(self.analyzer.stem(&token.text))
                    .or_default()
                    .push(offset + token.position);
            }
        }
        // every token advances the counter, terms and punctuation alike
        self.word_counts
            .insert(record.doc_id, offset + tokens.len() as u32);

        let mut length_gain = 0.0;
        for (term, positions) in term_positions {
            let term_frequency = positions.len() as u64;
            length_gain += log_tf(term_frequency).powi(2);

            if !self.dictionary.contains(&term) {
                self.term_lines.insert(term.clone(), self.dictionary.len());
            }

            let list = self.postings.entry(term.clone()).or_default();
            if list.last_doc_id() == Some(record.doc_id) {
                // same doc id on a later row: fold into the tail posting
                list.extend_last(&positions);
            } else {
                list.add(Posting::new(record.doc_id, term_frequency, positions));
                self.dictionary.terms.entry(term).or_default().doc_frequency += 1;
            }
        }

        self.documents.get_or_insert(record.doc_id).length += length_gain;
    }

    /// Writes postings lists in line order, compressing each on the way
    /// out.
    fn flush_postings(&mut self) -> Result<()> {
        let mut ordered: Vec<(String, usize)> = self
            .term_lines
            .iter()
            .map(|(term, line)| (term.clone(), *line))
            .collect();
        ordered.sort_by_key(|(_, line)| *line);

        let mut lists = Vec::with_capacity(ordered.len());
        for (term, _) in &ordered {
            let mut list = self.postings.remove(term).ok_or_else(|| {
                Error::new(
                    ErrorKind::Internal,
                    format!("postings list missing for term {:?}", term),
                )
            })?;
            list.compress();
            lists.push(list);
        }

        postings_file::write_postings(&self.postings_path, &lists)?;
        info!("saved postings lists to {}", self.postings_path.display());
        Ok(())
    }

    /// Walks the freshly written postings file and stores each term's
    /// line-start byte offset on its dictionary entry, dropping the line
    /// map.
    fn assign_offsets(&mut self) -> Result<()> {
        let pointers = postings_file::line_offsets(&self.postings_path)?;
        for (term, line) in self.term_lines.drain() {
            let offset = *pointers.get(line).ok_or_else(|| {
                Error::new(
                    ErrorKind::Internal,
                    format!("no line pointer for term {:?}", term),
                )
            })?;
            if let Some(entry) = self.dictionary.terms.get_mut(&term) {
                entry.offset = offset;
            }
        }
        Ok(())
    }

    /// Second pass: per-document top-k tf-idf vectors for feedback
    /// centroids.
    fn build_vectors(&mut self, source: &mut dyn RecordSource, limit: Option<usize>) -> Result<()> {
        let total_docs = self.documents.len();
        let mut seen = 0usize;
        for record in source.records()? {
            if limit.is_some_and(|n| seen == n) {
                break;
            }
            let record = record?;
            let vector = self.build_doc_vector(&record.content, total_docs);
            if let Some(doc) = self.documents.documents.get_mut(&record.doc_id) {
                doc.update_vector(vector);
            }
            seen += 1;
        }
        info!("document vectors built for {} documents", total_docs);
        Ok(())
    }

    /// Top-k tf-idf weighted terms of one content block.
    fn build_doc_vector(&self, content: &str, total_docs: usize) -> HashMap<String, f64> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for token in self.analyzer.tokenize(content) {
            if has_any_alphanumeric(&token.text) {
                *counts
                    .entry(self.analyzer.stem(&token.text))
                    .or_insert(0) += 1;
            }
        }

        let mut weights: Vec<(String, f64)> = counts
            .into_iter()
            .filter_map(|(term, frequency)| {
                self.dictionary.get(&term).map(|entry| {
                    let weight = log_tf(frequency) * idf(total_docs, entry.doc_frequency);
                    (term, weight)
                })
            })
            .collect();

        weights.sort_by(|a, b| b.1.total_cmp(&a.1));
        weights.truncate(self.config.vector_terms);
        weights.into_iter().collect()
    }

    fn persist(&self) -> Result<()> {
        persist::save(&self.dictionary_path, &self.dictionary)?;
        info!("saved dictionary to {}", self.dictionary_path.display());
        persist::save(&self.document_path, &self.documents)?;
        info!("saved documents to {}", self.document_path.display());
        Ok(())
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }
}
