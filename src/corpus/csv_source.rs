use std::path::PathBuf;
use chrono::NaiveDateTime;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;
use crate::corpus::record::{Record, RecordSource};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// CSV-backed record source.
///
/// Column order: doc_id, title, content, date_posted, court. The first row
/// is a header and is skipped. Every `records()` call reopens the file.
pub struct CsvSource {
    pub path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvSource { path: path.into() }
    }

    fn parse_row(row: &csv::StringRecord) -> Result<Record> {
        if row.len() < 5 {
            return Err(Error::new(
                ErrorKind::Format,
                format!("expected 5 CSV columns, got {}", row.len()),
            ));
        }
        let doc_id = row[0].trim().parse::<u64>().map_err(|_| {
            Error::new(ErrorKind::Format, format!("invalid doc id: {:?}", &row[0]))
        })?;
        let date_posted = NaiveDateTime::parse_from_str(&row[3], DATE_FORMAT)?;
        Ok(Record {
            doc_id: DocId(doc_id),
            title: row[1].to_string(),
            date_posted,
            court: row[4].to_string(),
            content: row[2].to_string(),
        })
    }
}

impl RecordSource for CsvSource {
    fn records(&mut self) -> Result<Box<dyn Iterator<Item = Result<Record>> + '_>> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        Ok(Box::new(reader.into_records().map(|row| {
            let row = row?;
            CsvSource::parse_row(&row)
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_records_and_skips_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "document_id,title,content,date_posted,court").unwrap();
        writeln!(
            file,
            "246391,Public Prosecutor v Tan,the accused was convicted,2017-03-21 04:23:00,SG High Court"
        )
        .unwrap();
        writeln!(
            file,
            "246392,Lee v Lee,appeal dismissed with costs,2018-01-05 09:00:00,SG Court of Appeal"
        )
        .unwrap();

        let mut source = CsvSource::new(file.path());
        let records: Vec<Record> = source
            .records()
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].doc_id, DocId(246391));
        assert_eq!(records[0].title, "Public Prosecutor v Tan");
        assert_eq!(records[0].court, "SG High Court");
        assert_eq!(
            records[0].date_posted,
            NaiveDateTime::parse_from_str("2017-03-21 04:23:00", DATE_FORMAT).unwrap()
        );
        assert_eq!(records[1].content, "appeal dismissed with costs");
    }

    #[test]
    fn test_rejects_bad_date() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "document_id,title,content,date_posted,court").unwrap();
        writeln!(file, "1,t,c,21-03-2017,court").unwrap();

        let mut source = CsvSource::new(file.path());
        let result: Result<Vec<Record>> = source.records().unwrap().collect();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_doc_id() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "document_id,title,content,date_posted,court").unwrap();
        writeln!(file, "abc,t,c,2017-03-21 04:23:00,court").unwrap();

        let mut source = CsvSource::new(file.path());
        let result: Result<Vec<Record>> = source.records().unwrap().collect();
        assert!(result.is_err());
    }
}
