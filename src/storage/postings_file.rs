use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::num::NonZeroUsize;
use std::path::Path;
use lru::LruCache;
use crate::core::error::Result;
use crate::index::posting::PostingsList;

/// Writes compressed postings lists, one per line, in the given order.
/// Line i must hold the list of the term assigned line i during indexing.
pub fn write_postings(path: &Path, lists: &[PostingsList]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for list in lists {
        writeln!(writer, "{}", list)?;
    }
    writer.flush()?;
    Ok(())
}

/// Byte offsets of every line start in the file, in line order.
pub fn line_offsets(path: &Path) -> Result<Vec<u64>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut offsets = Vec::new();
    let mut position = 0u64;
    let mut line = String::new();

    loop {
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }
        offsets.push(position);
        position += read as u64;
        line.clear();
    }

    Ok(offsets)
}

/// Random-access reader over the postings file.
///
/// Keeps one read-only handle open and memoizes recently expanded lists.
/// The file never changes at query time, so cached entries cannot go
/// stale.
pub struct PostingsReader {
    reader: BufReader<File>,
    cache: LruCache<u64, PostingsList>,
}

impl PostingsReader {
    pub fn open(path: &Path, cache_size: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(cache_size.max(1)).unwrap();
        Ok(PostingsReader {
            reader: BufReader::new(File::open(path)?),
            cache: LruCache::new(capacity),
        })
    }

    /// Reads the single line starting at the given byte offset.
    pub fn read_line_at(&mut self, offset: u64) -> Result<String> {
        self.reader.seek(SeekFrom::Start(offset))?;
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line)
    }

    /// Parses and expands the postings list at the given offset.
    pub fn postings_at(&mut self, offset: u64) -> Result<PostingsList> {
        if let Some(list) = self.cache.get(&offset) {
            return Ok(list.clone());
        }

        let line = self.read_line_at(offset)?;
        let mut list = PostingsList::parse(&line)?;
        list.decompress();
        self.cache.put(offset, list.clone());
        Ok(list)
    }
}
