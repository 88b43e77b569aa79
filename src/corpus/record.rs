use chrono::NaiveDateTime;
use crate::core::error::Result;
use crate::core::types::DocId;

/// One corpus row: a legal opinion with its metadata block.
///
/// The same doc id may appear on several rows with different metadata;
/// the indexer folds them into a single document.
#[derive(Debug, Clone)]
pub struct Record {
    pub doc_id: DocId,
    pub title: String,
    pub date_posted: NaiveDateTime,
    pub court: String,
    pub content: String,
}

/// A re-openable stream of corpus records.
///
/// The indexer runs two passes over the corpus (postings, then document
/// vectors), so a source must be able to restart from the beginning.
pub trait RecordSource {
    fn records(&mut self) -> Result<Box<dyn Iterator<Item = Result<Record>> + '_>>;
}
