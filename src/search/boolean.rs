use std::sync::Arc;
use log::debug;
use roaring::RoaringTreemap;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::index::dictionary::Dictionary;
use crate::index::posting::PostingsList;
use crate::storage::postings_file::PostingsReader;

/// Exact-match retrieval: the conjunction of term and phrase clauses.
///
/// Each clause resolves to a doc-id set; phrases enforce term adjacency
/// through the positional merge. A term missing from the dictionary
/// yields the empty set and empties the whole conjunction.
pub struct BooleanModel {
    pub dictionary: Arc<Dictionary>,
    reader: PostingsReader,
    phrase_distance: u32,
}

impl BooleanModel {
    pub fn new(dictionary: Arc<Dictionary>, reader: PostingsReader, config: &Config) -> Self {
        BooleanModel {
            dictionary,
            reader,
            phrase_distance: config.phrase_distance,
        }
    }

    /// Doc ids containing every given bare term and every phrase.
    pub fn retrieve(
        &mut self,
        terms: &[String],
        phrases: &[Vec<String>],
    ) -> Result<RoaringTreemap> {
        let mut clause_sets = Vec::with_capacity(terms.len() + phrases.len());
        for term in terms {
            clause_sets.push(self.term_set(term)?);
        }
        for phrase in phrases {
            clause_sets.push(self.phrase_set(phrase)?);
        }

        let mut sets = clause_sets.into_iter();
        let Some(mut result) = sets.next() else {
            return Ok(RoaringTreemap::new());
        };
        for set in sets {
            result &= set;
        }
        debug!("boolean retrieval matched {} documents", result.len());
        Ok(result)
    }

    /// The term's postings list, expanded; empty when unknown.
    fn postings(&mut self, term: &str) -> Result<PostingsList> {
        match self.dictionary.get(term) {
            Some(entry) => self.reader.postings_at(entry.offset),
            None => Ok(PostingsList::new()),
        }
    }

    fn term_set(&mut self, term: &str) -> Result<RoaringTreemap> {
        let list = self.postings(term)?;
        Ok(list.postings.iter().map(|p| p.doc_id.0).collect())
    }

    /// Left-to-right adjacency merge across the phrase terms.
    fn phrase_set(&mut self, phrase: &[String]) -> Result<RoaringTreemap> {
        let Some((first, rest)) = phrase.split_first() else {
            return Ok(RoaringTreemap::new());
        };

        let mut merged = self.postings(first)?;
        for term in rest {
            let next = self.postings(term)?;
            merged = PostingsList::merge(&merged, &next, self.phrase_distance);
        }
        Ok(merged.postings.iter().map(|p| p.doc_id.0).collect())
    }
}
