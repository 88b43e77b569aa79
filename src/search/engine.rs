use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use log::debug;
use crate::analysis::synonyms::SynonymSource;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::DocId;
use crate::index::dictionary::Dictionary;
use crate::index::document::DocumentStore;
use crate::query::parser::Query;
use crate::search::boolean::BooleanModel;
use crate::search::vector::VectorSpaceModel;
use crate::storage::persist;
use crate::storage::postings_file::PostingsReader;

/// Facade over the two retrieval models.
///
/// Free-text queries go straight to the vector space model. Boolean
/// queries intersect exact matches first, then order them by a cosine
/// ranking over the flattened clause terms. Relevance-judged doc ids
/// lead every result in the order supplied.
pub struct SearchEngine {
    pub dictionary: Arc<Dictionary>,
    pub documents: Arc<DocumentStore>,
    boolean: BooleanModel,
    vector: VectorSpaceModel,
}

impl SearchEngine {
    /// Loads the dictionary and document store whole into memory and
    /// opens one postings reader per model.
    pub fn open(
        dictionary_path: &Path,
        document_path: &Path,
        postings_path: &Path,
        config: Config,
    ) -> Result<Self> {
        let dictionary: Arc<Dictionary> = Arc::new(persist::load(dictionary_path)?);
        let documents: Arc<DocumentStore> = Arc::new(persist::load(document_path)?);
        debug!(
            "loaded {} terms and {} documents",
            dictionary.len(),
            documents.len()
        );

        let boolean = BooleanModel::new(
            Arc::clone(&dictionary),
            PostingsReader::open(postings_path, config.postings_cache_size)?,
            &config,
        );
        let vector = VectorSpaceModel::new(
            Arc::clone(&dictionary),
            Arc::clone(&documents),
            PostingsReader::open(postings_path, config.postings_cache_size)?,
            config,
        );

        Ok(SearchEngine {
            dictionary,
            documents,
            boolean,
            vector,
        })
    }

    /// Enables lexical query expansion on the free-text path.
    pub fn with_synonyms(mut self, source: Box<dyn SynonymSource>) -> Self {
        self.vector = self.vector.with_synonyms(source);
        self
    }

    pub fn search(&mut self, query: &Query, relevant: &[DocId]) -> Result<Vec<DocId>> {
        if query.is_boolean {
            self.search_boolean(query, relevant)
        } else {
            self.vector.retrieve(&query.free_text, relevant)
        }
    }

    /// Exact matches ordered by the ranked view of the flattened terms:
    /// seeds first, then ranked matches, then whatever exact matches the
    /// ranking never scored, in ascending doc id order.
    fn search_boolean(&mut self, query: &Query, relevant: &[DocId]) -> Result<Vec<DocId>> {
        let mut matches = self.boolean.retrieve(&query.free_text, &query.phrases)?;
        let ranked = self
            .vector
            .get_ranking(&query.flattened_terms(), relevant)?;

        let seeded: HashSet<DocId> = relevant.iter().copied().collect();
        let mut result: Vec<DocId> = relevant.to_vec();
        for doc_id in ranked {
            if !seeded.contains(&doc_id) && matches.contains(doc_id.0) {
                result.push(doc_id);
                matches.remove(doc_id.0);
            }
        }
        for raw in matches.iter() {
            result.push(DocId(raw));
        }
        Ok(result)
    }
}
