/// Tuning knobs for indexing and retrieval.
#[derive(Debug, Clone)]
pub struct Config {
    pub vector_terms: usize,        // top-k tf-idf terms kept per document
    pub feedback_depth: usize,      // result pool size for pseudo-relevance feedback
    pub query_coefficient: f64,     // Rocchio weight on the query vector
    pub centroid_coefficient: f64,  // Rocchio weight on the relevant centroid
    pub phrase_distance: u32,       // positional distance for phrase adjacency
    pub postings_cache_size: usize, // LRU capacity of the postings reader
}

impl Default for Config {
    fn default() -> Self {
        Config {
            vector_terms: 20,
            feedback_depth: 10,
            query_coefficient: 0.5,
            centroid_coefficient: 0.5,
            phrase_distance: 1,
            postings_cache_size: 256,
        }
    }
}
