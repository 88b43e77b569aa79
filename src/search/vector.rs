use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};
use std::sync::Arc;
use log::debug;
use crate::analysis::synonyms::SynonymSource;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::DocId;
use crate::core::utils::{idf, log_tf};
use crate::index::dictionary::Dictionary;
use crate::index::document::DocumentStore;
use crate::index::posting::PostingsList;
use crate::storage::postings_file::PostingsReader;

/// A doc id / score pairing with a total order for the ranking heap.
///
/// Scores are finite by construction (every input is a finite positive
/// weight), so `total_cmp` gives a lawful ordering; equal scores fall
/// back to heap insertion order to keep rankings deterministic.
#[derive(Debug, Clone)]
struct Score {
    doc_id: DocId,
    score: f64,
    sequence: usize,
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        // max-heap: higher score first, then earlier insertion
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Free-text ranked retrieval: tf-idf cosine scoring with Rocchio
/// relevance feedback, optional lexical expansion, and pseudo-relevance
/// feedback.
///
/// Vectors are sparse maps from term to weight; a missing term weighs
/// zero.
pub struct VectorSpaceModel {
    pub dictionary: Arc<Dictionary>,
    pub documents: Arc<DocumentStore>,
    reader: PostingsReader,
    synonyms: Option<Box<dyn SynonymSource>>,
    config: Config,
}

impl VectorSpaceModel {
    pub fn new(
        dictionary: Arc<Dictionary>,
        documents: Arc<DocumentStore>,
        reader: PostingsReader,
        config: Config,
    ) -> Self {
        VectorSpaceModel {
            dictionary,
            documents,
            reader,
            synonyms: None,
            config,
        }
    }

    /// Enables lexical query expansion through the given source.
    pub fn with_synonyms(mut self, source: Box<dyn SynonymSource>) -> Self {
        self.synonyms = Some(source);
        self
    }

    /// Full free-text pipeline: feedback, expansion, pseudo-relevance
    /// feedback, final ranking. `relevant` seeds lead the result in the
    /// order supplied; without judged seeds the query runs as plain
    /// cosine ranking.
    pub fn retrieve(&mut self, terms: &[String], relevant: &[DocId]) -> Result<Vec<DocId>> {
        debug!("vector space search on {:?}", terms);
        let mut query_vector = self.build_query_vector(terms);
        if !relevant.is_empty() {
            query_vector = self.apply_feedback(query_vector, relevant);
            query_vector = self.expand_query(query_vector);
            query_vector = self.pseudo_feedback(query_vector, relevant)?;
        }
        self.rank(&query_vector, relevant)
    }

    /// Feedback-then-rank without expansion or PRF; the facade orders its
    /// boolean matches with this.
    pub fn get_ranking(&mut self, terms: &[String], relevant: &[DocId]) -> Result<Vec<DocId>> {
        let mut query_vector = self.build_query_vector(terms);
        if !relevant.is_empty() {
            query_vector = self.apply_feedback(query_vector, relevant);
        }
        self.rank(&query_vector, relevant)
    }

    /// tf-idf weighted query vector over terms known to the dictionary.
    /// Negative weights clamp to zero.
    fn build_query_vector(&self, terms: &[String]) -> HashMap<String, f64> {
        let mut vector: HashMap<String, f64> = HashMap::new();
        for term in terms {
            if self.dictionary.contains(term) {
                *vector.entry(term.clone()).or_insert(0.0) += 1.0;
            }
        }

        let total_docs = self.documents.len();
        for (term, value) in vector.iter_mut() {
            if let Some(entry) = self.dictionary.get(term) {
                let weight = log_tf(*value as u64) * idf(total_docs, entry.doc_frequency);
                *value = weight.max(0.0);
            }
        }
        vector
    }

    /// Per-key average of the given vectors.
    fn build_centroid(vectors: &[HashMap<String, f64>]) -> HashMap<String, f64> {
        let mut centroid: HashMap<String, f64> = HashMap::new();
        for vector in vectors {
            for (term, weight) in vector {
                *centroid.entry(term.clone()).or_insert(0.0) += weight;
            }
        }
        let count = vectors.len() as f64;
        if count > 0.0 {
            for weight in centroid.values_mut() {
                *weight /= count;
            }
        }
        centroid
    }

    /// Rocchio: linear combination over the union of term keys.
    fn adjust_query(
        &self,
        query_vector: &HashMap<String, f64>,
        centroid: &HashMap<String, f64>,
    ) -> HashMap<String, f64> {
        let mut adjusted: HashMap<String, f64> = HashMap::new();
        for (term, weight) in query_vector {
            *adjusted.entry(term.clone()).or_insert(0.0) +=
                self.config.query_coefficient * weight;
        }
        for (term, weight) in centroid {
            *adjusted.entry(term.clone()).or_insert(0.0) +=
                self.config.centroid_coefficient * weight;
        }
        adjusted
    }

    /// Normalized stored vectors of the given documents; unknown ids and
    /// zero-length documents contribute nothing.
    fn feedback_vectors(&self, doc_ids: &[DocId]) -> Vec<HashMap<String, f64>> {
        doc_ids
            .iter()
            .filter_map(|id| self.documents.get(*id))
            .map(|doc| doc.normalized_vector())
            .collect()
    }

    /// Rocchio feedback against the documents judged relevant.
    fn apply_feedback(
        &self,
        query_vector: HashMap<String, f64>,
        relevant: &[DocId],
    ) -> HashMap<String, f64> {
        let vectors = self.feedback_vectors(relevant);
        if vectors.is_empty() {
            return query_vector;
        }
        let centroid = Self::build_centroid(&vectors);
        self.adjust_query(&query_vector, &centroid)
    }

    /// Adds synonyms of the adjusted query's terms, each weighted by the
    /// mean weight of the terms that produced it.
    fn expand_query(&self, mut query_vector: HashMap<String, f64>) -> HashMap<String, f64> {
        let Some(source) = &self.synonyms else {
            return query_vector;
        };

        let mut contributions: HashMap<String, (f64, usize)> = HashMap::new();
        for (term, weight) in &query_vector {
            for synonym in source.synonyms(term) {
                let slot = contributions.entry(synonym).or_insert((0.0, 0));
                slot.0 += weight;
                slot.1 += 1;
            }
        }

        for (synonym, (total, count)) in contributions {
            *query_vector.entry(synonym).or_insert(0.0) += total / count as f64;
        }
        query_vector
    }

    /// One PRF round: rank, assume the best unjudged results are
    /// relevant, and fold their centroid into the query.
    fn pseudo_feedback(
        &mut self,
        query_vector: HashMap<String, f64>,
        relevant: &[DocId],
    ) -> Result<HashMap<String, f64>> {
        let pool = self.config.feedback_depth.saturating_sub(relevant.len());
        if pool == 0 {
            return Ok(query_vector);
        }

        let ranked = self.rank(&query_vector, relevant)?;
        let seeded: HashSet<DocId> = relevant.iter().copied().collect();
        let assumed: Vec<DocId> = ranked
            .into_iter()
            .filter(|id| !seeded.contains(id))
            .take(pool)
            .collect();

        let vectors = self.feedback_vectors(&assumed);
        if vectors.is_empty() {
            return Ok(query_vector);
        }
        debug!("pseudo-relevance feedback over {} documents", vectors.len());
        let centroid = Self::build_centroid(&vectors);
        Ok(self.adjust_query(&query_vector, &centroid))
    }

    /// Cosine ranking: accumulate per-document dot products, divide by
    /// the stored document length, emit best first behind the relevant
    /// seeds. Documents with zero length are never scored.
    fn rank(&mut self, query_vector: &HashMap<String, f64>, relevant: &[DocId]) -> Result<Vec<DocId>> {
        let mut scores: BTreeMap<DocId, f64> = BTreeMap::new();
        for (term, query_weight) in query_vector {
            let list = self.postings(term)?;
            for posting in &list.postings {
                *scores.entry(posting.doc_id).or_insert(0.0) +=
                    log_tf(posting.term_frequency) * query_weight;
            }
        }

        let mut heap = BinaryHeap::with_capacity(scores.len());
        let mut sequence = 0usize;
        for (doc_id, dot_product) in scores {
            let Some(doc) = self.documents.get(doc_id) else {
                continue;
            };
            if doc.length == 0.0 {
                continue;
            }
            heap.push(Score {
                doc_id,
                score: dot_product / doc.length,
                sequence,
            });
            sequence += 1;
        }

        let mut output: Vec<DocId> = relevant.to_vec();
        let seeded: HashSet<DocId> = relevant.iter().copied().collect();
        while let Some(next) = heap.pop() {
            if !seeded.contains(&next.doc_id) {
                output.push(next.doc_id);
            }
        }
        Ok(output)
    }

    /// The term's postings list, expanded; empty when unknown.
    fn postings(&mut self, term: &str) -> Result<PostingsList> {
        match self.dictionary.get(term) {
            Some(entry) => self.reader.postings_at(entry.offset),
            None => Ok(PostingsList::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Map;
    use crate::analysis::analyzer::Analyzer;
    use crate::analysis::synonyms::StaticSynonyms;
    use crate::index::indexer::Indexer;
    use crate::storage::persist;
    use crate::testing::{VecSource, record};

    fn model_over(
        records: Vec<crate::corpus::record::Record>,
    ) -> (VectorSpaceModel, Analyzer, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let postings = dir.path().join("postings.txt");
        let dictionary_path = dir.path().join("dictionary.txt");
        let document_path = dir.path().join("document.txt");

        let analyzer = Analyzer::standard_english();
        let config = Config::default();
        let mut indexer = Indexer::new(
            &analyzer,
            config.clone(),
            &postings,
            &dictionary_path,
            &document_path,
        );
        indexer.index(&mut VecSource(records), None).unwrap();

        let dictionary: Arc<Dictionary> = Arc::new(persist::load(&dictionary_path).unwrap());
        let documents: Arc<DocumentStore> = Arc::new(persist::load(&document_path).unwrap());
        let reader = PostingsReader::open(&postings, config.postings_cache_size).unwrap();
        (
            VectorSpaceModel::new(dictionary, documents, reader, config),
            analyzer,
            dir,
        )
    }

    #[test]
    fn test_score_ordering_is_total_and_tie_stable() {
        let mut heap = BinaryHeap::new();
        heap.push(Score { doc_id: DocId(1), score: 0.5, sequence: 0 });
        heap.push(Score { doc_id: DocId(2), score: 0.5, sequence: 1 });
        heap.push(Score { doc_id: DocId(3), score: 0.9, sequence: 2 });

        assert_eq!(heap.pop().unwrap().doc_id, DocId(3));
        // equal scores pop in insertion order
        assert_eq!(heap.pop().unwrap().doc_id, DocId(1));
        assert_eq!(heap.pop().unwrap().doc_id, DocId(2));
    }

    #[test]
    fn test_cosine_ranking_two_doc_corpus() {
        // doc 1: "apple apple", doc 2: "apple banana"
        let (mut model, analyzer, _dir) = model_over(vec![
            record(1, "apple apple"),
            record(2, "apple banana"),
        ]);

        let result = model.retrieve(&[analyzer.stem("apple")], &[]).unwrap();
        assert_eq!(result, vec![DocId(1), DocId(2)]);
    }

    #[test]
    fn test_cosine_ranking_prefers_higher_tf() {
        // the cherry doc keeps idf("apple") above zero
        let (mut model, analyzer, _dir) = model_over(vec![
            record(1, "apple apple"),
            record(2, "apple banana"),
            record(3, "cherry"),
        ]);

        let result = model.retrieve(&[analyzer.stem("apple")], &[]).unwrap();
        // doc 3 never scores: it holds no query term
        assert_eq!(result, vec![DocId(1), DocId(2)]);
    }

    #[test]
    fn test_unknown_query_terms_drop_out() {
        let (mut model, analyzer, _dir) = model_over(vec![record(1, "apple")]);

        let terms = vec![analyzer.stem("apple"), analyzer.stem("nonexistent")];
        let vector = model.build_query_vector(&terms);
        assert_eq!(vector.len(), 1);

        let result = model.retrieve(&terms, &[]).unwrap();
        assert_eq!(result, vec![DocId(1)]);
    }

    #[test]
    fn test_relevant_seeds_lead_the_result() {
        let (mut model, analyzer, _dir) = model_over(vec![
            record(3, "contract breach damages"),
            record(5, "contract damages"),
            record(7, "contract"),
        ]);

        let result = model
            .retrieve(&[analyzer.stem("contract")], &[DocId(7)])
            .unwrap();
        assert_eq!(result[0], DocId(7));
        assert_eq!(result.len(), 3);
        assert!(result.contains(&DocId(3)));
        assert!(result.contains(&DocId(5)));
    }

    #[test]
    fn test_centroid_is_per_key_average() {
        let vectors = vec![
            Map::from([("a".to_string(), 1.0), ("b".to_string(), 2.0)]),
            Map::from([("a".to_string(), 3.0)]),
        ];
        let centroid = VectorSpaceModel::build_centroid(&vectors);
        assert_eq!(centroid["a"], 2.0);
        assert_eq!(centroid["b"], 1.0);
    }

    #[test]
    fn test_rocchio_halves_and_combines() {
        let (model, _, _dir) = model_over(vec![record(1, "apple")]);

        let query = Map::from([("apple".to_string(), 1.0)]);
        let centroid = Map::from([("apple".to_string(), 0.4), ("pear".to_string(), 0.8)]);
        let adjusted = model.adjust_query(&query, &centroid);

        assert!((adjusted["apple"] - 0.7).abs() < 1e-12);
        assert!((adjusted["pear"] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_expansion_uses_mean_of_contributing_weights() {
        let (model, _, _dir) = model_over(vec![record(1, "apple")]);
        let mut table = Map::new();
        table.insert(
            "apple".to_string(),
            HashSet::from(["fruit".to_string()]),
        );
        table.insert(
            "pear".to_string(),
            HashSet::from(["fruit".to_string()]),
        );
        let model = model.with_synonyms(Box::new(StaticSynonyms::new(table)));

        let query = Map::from([("apple".to_string(), 1.0), ("pear".to_string(), 0.5)]);
        let expanded = model.expand_query(query);

        // mean of 1.0 and 0.5
        assert!((expanded["fruit"] - 0.75).abs() < 1e-12);
        assert_eq!(expanded["apple"], 1.0);
    }

    #[test]
    fn test_expansion_without_source_is_identity() {
        let (model, _, _dir) = model_over(vec![record(1, "apple")]);
        let query = Map::from([("apple".to_string(), 1.0)]);
        assert_eq!(model.expand_query(query.clone()), query);
    }

    #[test]
    fn test_pseudo_feedback_folds_in_neighbour_terms() {
        // doc 1 carries "banana"; assuming it relevant pulls banana into
        // the query vector
        let (mut model, analyzer, _dir) = model_over(vec![
            record(1, "apple banana"),
            record(2, "apple"),
        ]);

        let apple = analyzer.stem("apple");
        let banana = analyzer.stem("banana");
        let query = Map::from([(apple.clone(), 0.0)]);

        let adjusted = model.pseudo_feedback(query, &[DocId(2)]).unwrap();
        assert!(adjusted.contains_key(&banana));
        assert!(adjusted[&banana] > 0.0);
    }

    #[test]
    fn test_pseudo_feedback_skips_a_full_seed_pool() {
        let (mut model, analyzer, _dir) = model_over(vec![record(1, "apple")]);

        let seeds: Vec<DocId> = (1..=10).map(DocId).collect();
        let query = Map::from([(analyzer.stem("apple"), 1.0)]);
        let adjusted = model.pseudo_feedback(query.clone(), &seeds).unwrap();
        // max(0, 10 - |R|) is zero: the query passes through untouched
        assert_eq!(adjusted, query);
    }

    #[test]
    fn test_retrieve_returns_each_doc_once() {
        let (mut model, analyzer, _dir) = model_over(vec![
            record(1, "tort negligence"),
            record(2, "tort"),
            record(3, "negligence"),
        ]);

        let result = model
            .retrieve(
                &[analyzer.stem("tort"), analyzer.stem("negligence")],
                &[DocId(2)],
            )
            .unwrap();

        let unique: HashSet<DocId> = result.iter().copied().collect();
        assert_eq!(unique.len(), result.len());
        assert_eq!(result[0], DocId(2));
    }
}
