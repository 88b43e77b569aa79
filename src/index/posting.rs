use std::fmt;
use std::sync::LazyLock;
use regex::Regex;
use crate::compression::gap::GapCodec;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;

const POSTING_DELIMITER: char = '/';
const POSITION_DELIMITER: char = ',';
const LIST_DELIMITER: char = ' ';

/// Wire format of one posting: `doc_id/tf/p1,p2,...`, all decimal ASCII.
static POSTING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*/[0-9]*/[0-9]+(,[0-9]+)*$").unwrap());

/// A single term occurrence record for one document.
///
/// `positions` are absolute token positions when expanded and gaps when
/// compressed; `term_frequency` always equals the position count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u64,
    pub positions: Vec<u32>,
}

impl Posting {
    pub fn new(doc_id: DocId, term_frequency: u64, positions: Vec<u32>) -> Self {
        Posting {
            doc_id,
            term_frequency,
            positions,
        }
    }

    /// Parses one posting field as written, without undoing the gap
    /// encoding.
    pub fn parse(field: &str) -> Result<Posting> {
        if !POSTING_PATTERN.is_match(field) {
            return Err(Error::new(
                ErrorKind::Format,
                format!("invalid posting format: {:?}", field),
            ));
        }

        let mut parts = field.split(POSTING_DELIMITER);
        let doc_id = parse_integer(parts.next().unwrap_or(""))?;
        let term_frequency = parse_integer(parts.next().unwrap_or(""))?;
        let positions = parts
            .next()
            .unwrap_or("")
            .split(POSITION_DELIMITER)
            .map(|p| parse_integer(p).map(|v| v as u32))
            .collect::<Result<Vec<u32>>>()?;

        Ok(Posting::new(DocId(doc_id), term_frequency, positions))
    }

    fn compress(&mut self) {
        self.positions = GapCodec::encode_u32_list(&self.positions);
    }

    fn decompress(&mut self) {
        self.positions = GapCodec::decode_u32_list(&self.positions);
    }
}

fn parse_integer(text: &str) -> Result<u64> {
    text.parse::<u64>().map_err(|_| {
        Error::new(
            ErrorKind::Format,
            format!("invalid integer in posting: {:?}", text),
        )
    })
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let positions = self
            .positions
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(&POSITION_DELIMITER.to_string());
        write!(
            f,
            "{}{}{}{}{}",
            self.doc_id, POSTING_DELIMITER, self.term_frequency, POSTING_DELIMITER, positions
        )
    }
}

/// All postings of one term, ordered by ascending doc id.
///
/// Lists are compressed when written to disk (gap encoding over doc ids
/// and positions) and expanded before any retrieval runs over them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingsList {
    pub postings: Vec<Posting>,
}

impl PostingsList {
    pub fn new() -> Self {
        PostingsList {
            postings: Vec::new(),
        }
    }

    /// Parses one postings-file line as written. The caller decides when
    /// to `decompress`.
    pub fn parse(line: &str) -> Result<PostingsList> {
        let line = line.trim_end_matches(['\n', '\r']);
        let postings = line
            .split(LIST_DELIMITER)
            .map(Posting::parse)
            .collect::<Result<Vec<Posting>>>()?;
        Ok(PostingsList { postings })
    }

    /// Appends a posting; its doc id must strictly exceed every existing
    /// one.
    pub fn add(&mut self, posting: Posting) {
        debug_assert!(
            self.last_doc_id().is_none_or(|last| last < posting.doc_id),
            "postings must arrive in ascending doc id order"
        );
        self.postings.push(posting);
    }

    /// Folds additional positions into the tail posting, for a document
    /// whose rows arrive back to back under the same doc id.
    pub fn extend_last(&mut self, positions: &[u32]) {
        if let Some(last) = self.postings.last_mut() {
            last.term_frequency += positions.len() as u64;
            last.positions.extend_from_slice(positions);
        }
    }

    pub fn last_doc_id(&self) -> Option<DocId> {
        self.postings.last().map(|p| p.doc_id)
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Gap-encodes the doc id sequence and every posting's positions.
    pub fn compress(&mut self) {
        let doc_ids: Vec<u64> = self.postings.iter().map(|p| p.doc_id.0).collect();
        let gaps = GapCodec::encode_u64_list(&doc_ids);
        for (gap, posting) in gaps.into_iter().zip(self.postings.iter_mut()) {
            posting.doc_id = DocId(gap);
            posting.compress();
        }
    }

    /// Reverses the gap encoding back to absolute values.
    pub fn decompress(&mut self) {
        let gaps: Vec<u64> = self.postings.iter().map(|p| p.doc_id.0).collect();
        let doc_ids = GapCodec::decode_u64_list(&gaps);
        for (doc_id, posting) in doc_ids.into_iter().zip(self.postings.iter_mut()) {
            posting.doc_id = DocId(doc_id);
            posting.decompress();
        }
    }

    /// Merges two expanded postings lists at a fixed positional distance.
    ///
    /// Emits one posting per doc id present in both lists whose positions
    /// hold a pair `(i, j)` with `j - i == distance`. The emitted
    /// positions are the `j` ends of the matched pairs, so chained merges
    /// resolve phrases of any length:
    /// `merge(merge(a, b, 1), c, 1)` finds "a b c".
    pub fn merge(p1: &PostingsList, p2: &PostingsList, distance: u32) -> PostingsList {
        let mut output = PostingsList::new();
        let (mut a, mut b) = (0, 0);

        while a < p1.postings.len() && b < p2.postings.len() {
            let (pa, pb) = (&p1.postings[a], &p2.postings[b]);
            if pa.doc_id < pb.doc_id {
                a += 1;
            } else if pa.doc_id > pb.doc_id {
                b += 1;
            } else {
                let matches = within_proximity(&pa.positions, &pb.positions, distance);
                if !matches.is_empty() {
                    output
                        .postings
                        .push(Posting::new(pb.doc_id, matches.len() as u64, matches));
                }
                a += 1;
                b += 1;
            }
        }

        output
    }
}

/// Positions `j` of `l2` for which some `i` of `l1` satisfies
/// `j - i == distance`. Both inputs must be sorted ascending.
fn within_proximity(l1: &[u32], l2: &[u32], distance: u32) -> Vec<u32> {
    let mut output = Vec::new();
    let (mut a, mut b) = (0, 0);

    while a < l1.len() && b < l2.len() {
        let shifted = l1[a] + distance;
        if shifted < l2[b] {
            a += 1;
        } else if shifted > l2[b] {
            b += 1;
        } else {
            output.push(l2[b]);
            a += 1;
            b += 1;
        }
    }

    output
}

impl fmt::Display for PostingsList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rendered = self
            .postings
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(&LIST_DELIMITER.to_string());
        write!(f, "{}", rendered)
    }
}
