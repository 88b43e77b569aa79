pub mod core;
pub mod analysis;
pub mod compression;
pub mod corpus;
pub mod index;
pub mod storage;
pub mod query;
pub mod search;

#[cfg(test)]
pub mod testing;

/*
┌──────────────────────────────────────────────────────────────────────────┐
│                       JURISDEX STRUCT ARCHITECTURE                       │
└──────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────────── INDEXING ───────────────────────────────┐
│                                                                          │
│  ┌──────────────────────────────────────────────────────────────────┐   │
│  │                         struct Indexer                           │   │
│  │  analyzer: &Analyzer                // tokenize + stem           │   │
│  │  dictionary: Dictionary             // term -> TermEntry         │   │
│  │  documents: DocumentStore           // doc_id -> DocEntry        │   │
│  │  postings: HashMap<String, PostingsList>                         │   │
│  │  term_lines: HashMap<String, usize> // build state only          │   │
│  │  word_counts: HashMap<DocId, u32>   // build state only          │   │
│  └──────────────────────────────────────────────────────────────────┘   │
│                                                                          │
│  ┌──────────────────┐  ┌─────────────────────┐  ┌─────────────────────┐  │
│  │ struct TermEntry │  │ struct PostingsList │  │ struct Posting      │  │
│  │ • doc_frequency  │  │ • postings: Vec<>   │  │ • doc_id: DocId     │  │
│  │ • offset: u64    │  │ • merge()           │  │ • term_frequency    │  │
│  └──────────────────┘  │ • compress()        │  │ • positions: Vec    │  │
│                        └─────────────────────┘  └─────────────────────┘  │
└──────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────── SEARCH ────────────────────────────────┐
│                                                                          │
│  ┌──────────────────────────────────────────────────────────────────┐   │
│  │                       struct SearchEngine                        │   │
│  │  dictionary: Arc<Dictionary>    // loaded whole at query time    │   │
│  │  documents: Arc<DocumentStore>  // metadata, lengths, vectors    │   │
│  │  boolean: BooleanModel          // phrase merge + intersection   │   │
│  │  vector: VectorSpaceModel       // cosine, Rocchio, PRF          │   │
│  └──────────────────────────────────────────────────────────────────┘   │
│                                                                          │
│  ┌─────────────────────┐  ┌───────────────────────┐  ┌───────────────┐   │
│  │ struct QueryParser  │  │ struct PostingsReader │  │ struct Score  │   │
│  │ • analyzer          │  │ • seek + read_line    │  │ • doc_id      │   │
│  │ • parse() -> Query  │  │ • LruCache<u64, PL>   │  │ • score: f64  │   │
│  └─────────────────────┘  └───────────────────────┘  └───────────────┘   │
└──────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── RELATIONSHIPS ────────────────────────────┐
│                                                                          │
│  CsvSource ──records──> Indexer ──flushes──> postings file (text lines)  │
│     │                      │                                             │
│     │                      └──persists──> dictionary file, document file │
│     │                                        (bincode + lz4 + crc32)     │
│                                                                          │
│  SearchEngine ──routes──> BooleanModel ──merges──> PostingsList          │
│       │                                                                  │
│       └──ranks──> VectorSpaceModel ──reads──> PostingsReader             │
│                                                                          │
└──────────────────────────────────────────────────────────────────────────┘
*/
