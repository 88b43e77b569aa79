//! Shared fixtures for unit tests.

use chrono::NaiveDateTime;
use crate::core::error::Result;
use crate::core::types::DocId;
use crate::corpus::record::{Record, RecordSource};

/// In-memory record source; `records()` replays the same rows each call,
/// like a file-backed source does.
pub struct VecSource(pub Vec<Record>);

impl RecordSource for VecSource {
    fn records(&mut self) -> Result<Box<dyn Iterator<Item = Result<Record>> + '_>> {
        Ok(Box::new(self.0.clone().into_iter().map(Ok)))
    }
}

/// A corpus row with fixed metadata and the given content.
pub fn record(doc_id: u64, content: &str) -> Record {
    Record {
        doc_id: DocId(doc_id),
        title: format!("case {}", doc_id),
        date_posted: NaiveDateTime::parse_from_str("2017-03-21 04:23:00", "%Y-%m-%d %H:%M:%S")
            .unwrap(),
        court: "SG High Court".to_string(),
        content: content.to_string(),
    }
}
