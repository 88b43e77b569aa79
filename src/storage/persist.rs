use std::fs;
use std::path::Path;
use serde::Serialize;
use serde::de::DeserializeOwned;
use crate::core::error::{Error, ErrorKind, Result};

/// File layout: 4-byte magic, little-endian crc32 of the compressed
/// payload, then the lz4 block with its decompressed size prepended.
const MAGIC: &[u8; 4] = b"JDX1";

/// Serializes a value into a checksummed, compressed block on disk.
/// Used for the dictionary and document maps; round-trips them exactly.
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let payload = bincode::serialize(value)?;
    let compressed = lz4_flex::compress_prepend_size(&payload);

    let mut bytes = Vec::with_capacity(compressed.len() + 8);
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&crc32fast::hash(&compressed).to_le_bytes());
    bytes.extend_from_slice(&compressed);
    fs::write(path, bytes)?;
    Ok(())
}

/// Reads back a value written by `save`, verifying magic and checksum.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)?;
    if bytes.len() < 8 || &bytes[..4] != MAGIC {
        return Err(Error::new(
            ErrorKind::Format,
            format!("{} is not a jurisdex data file", path.display()),
        ));
    }

    let stored = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let compressed = &bytes[8..];
    if crc32fast::hash(compressed) != stored {
        return Err(Error::new(
            ErrorKind::Format,
            format!("checksum mismatch in {}", path.display()),
        ));
    }

    let payload = lz4_flex::decompress_size_prepended(compressed).map_err(|e| {
        Error::new(
            ErrorKind::Format,
            format!("corrupt block in {}: {}", path.display(), e),
        )
    })?;
    Ok(bincode::deserialize(&payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::index::dictionary::{Dictionary, TermEntry};

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.txt");

        let mut dictionary = Dictionary::new();
        dictionary.terms.insert(
            "appeal".to_string(),
            TermEntry {
                doc_frequency: 12,
                offset: 4096,
            },
        );

        save(&path, &dictionary).unwrap();
        let loaded: Dictionary = load(&path).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("appeal"), Some(&dictionary.terms["appeal"]));
    }

    #[test]
    fn test_rejects_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.txt");

        let value: HashMap<String, u64> = HashMap::from([("x".to_string(), 1)]);
        save(&path, &value).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        fs::write(&path, bytes).unwrap();

        let result: Result<HashMap<String, u64>> = load(&path);
        assert!(matches!(result, Err(e) if e.kind == ErrorKind::Format));
    }

    #[test]
    fn test_rejects_foreign_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-index");
        fs::write(&path, b"just some text").unwrap();

        let result: Result<HashMap<String, u64>> = load(&path);
        assert!(matches!(result, Err(e) if e.kind == ErrorKind::Format));
    }
}
