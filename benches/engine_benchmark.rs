use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::path::PathBuf;
use chrono::NaiveDateTime;
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use jurisdex::analysis::analyzer::Analyzer;
use jurisdex::core::config::Config;
use jurisdex::core::error::Result;
use jurisdex::core::types::DocId;
use jurisdex::corpus::record::{Record, RecordSource};
use jurisdex::index::indexer::Indexer;
use jurisdex::query::parser::QueryParser;
use jurisdex::search::engine::SearchEngine;

const VOCABULARY: &[&str] = &[
    "appeal", "conviction", "sentence", "damages", "contract", "breach", "negligence",
    "statute", "evidence", "witness", "fraud", "trustee", "fiduciary", "duty", "costs",
    "judgment", "plaintiff", "defendant", "court", "dismissed",
];

struct SyntheticSource {
    seed: u64,
    documents: usize,
    words_per_document: usize,
}

impl RecordSource for SyntheticSource {
    fn records(&mut self) -> Result<Box<dyn Iterator<Item = Result<Record>> + '_>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let date =
            NaiveDateTime::parse_from_str("2017-03-21 04:23:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let words = self.words_per_document;
        let records: Vec<Record> = (1..=self.documents as u64)
            .map(|doc_id| {
                let content: String = (0..words)
                    .map(|_| VOCABULARY[rng.gen_range(0..VOCABULARY.len())])
                    .collect::<Vec<_>>()
                    .join(" ");
                Record {
                    doc_id: DocId(doc_id),
                    title: format!("case {}", doc_id),
                    date_posted: date,
                    court: "SG High Court".to_string(),
                    content,
                }
            })
            .collect();
        Ok(Box::new(records.into_iter().map(Ok)))
    }
}

fn build_index(dir: &tempfile::TempDir, documents: usize) -> (PathBuf, PathBuf, PathBuf) {
    let postings = dir.path().join("postings.txt");
    let dictionary = dir.path().join("dictionary.txt");
    let document_file = dir.path().join("document.txt");

    let analyzer = Analyzer::standard_english();
    let mut source = SyntheticSource {
        seed: 42,
        documents,
        words_per_document: 200,
    };
    let mut indexer = Indexer::new(
        &analyzer,
        Config::default(),
        &postings,
        &dictionary,
        &document_file,
    );
    indexer.index(&mut source, None).unwrap();
    (postings, dictionary, document_file)
}

fn bench_indexing(c: &mut Criterion) {
    c.bench_function("index_500_documents", |b| {
        b.iter(|| {
            let dir = tempfile::tempdir().unwrap();
            build_index(black_box(&dir), 500);
        });
    });
}

fn bench_free_text_search(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let (postings, dictionary, document_file) = build_index(&dir, 1000);
    let analyzer = Analyzer::standard_english();
    let mut engine =
        SearchEngine::open(&dictionary, &document_file, &postings, Config::default()).unwrap();
    let parser = QueryParser::new(&analyzer);
    let query = parser.parse("breach fiduciary duty damages").unwrap();

    c.bench_function("free_text_search", |b| {
        b.iter(|| engine.search(black_box(&query), &[]).unwrap());
    });
}

fn bench_phrase_search(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let (postings, dictionary, document_file) = build_index(&dir, 1000);
    let analyzer = Analyzer::standard_english();
    let mut engine =
        SearchEngine::open(&dictionary, &document_file, &postings, Config::default()).unwrap();
    let parser = QueryParser::new(&analyzer);
    let query = parser.parse("\"fiduciary duty\" AND damages").unwrap();

    c.bench_function("phrase_search", |b| {
        b.iter(|| engine.search(black_box(&query), &[]).unwrap());
    });
}

criterion_group!(
    benches,
    bench_indexing,
    bench_free_text_search,
    bench_phrase_search
);
criterion_main!(benches);
