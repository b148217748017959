//! Per-path fingerprint: size, content hash and modification time.

use std::fs::{File, Metadata};
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// Persisted attributes of one indexed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub size: u64,
    /// Lowercase hex SHA-1 of the file contents.
    pub content_hash: String,
    /// Modification time in epoch seconds.
    pub modified_at: i64,
}

impl Fingerprint {
    pub fn new(size: u64, content_hash: impl Into<String>, modified_at: i64) -> Self {
        Self {
            size,
            content_hash: content_hash.into(),
            modified_at,
        }
    }

    /// Stats and hashes `path`.
    pub fn compute(path: &Path, chunk_size: usize) -> io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let content_hash = sha1_file(path, chunk_size)?;
        Ok(Self {
            size: metadata.len(),
            content_hash,
            modified_at: modified_epoch_secs(&metadata),
        })
    }
}

/// Hashes a file in fixed-size chunks.
pub fn sha1_file(path: &Path, chunk_size: usize) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha1::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];
    loop {
        let read = reader.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        hasher.update(&chunk[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Modification time in epoch seconds; negative for pre-epoch stamps.
pub fn modified_epoch_secs(metadata: &Metadata) -> i64 {
    let Ok(modified) = metadata.modified() else {
        return 0;
    };
    match modified.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn compute_hashes_contents() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, b"hello world").expect("write");

        let fingerprint = Fingerprint::compute(&path, 4).expect("compute");
        assert_eq!(fingerprint.size, 11);
        assert_eq!(
            fingerprint.content_hash,
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
        );
        assert!(fingerprint.modified_at > 0);
    }

    #[test]
    fn empty_file_hash() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("empty");
        std::fs::write(&path, b"").expect("write");

        let fingerprint = Fingerprint::compute(&path, 4096).expect("compute");
        assert_eq!(fingerprint.size, 0);
        assert_eq!(
            fingerprint.content_hash,
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn chunk_size_does_not_change_hash() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("data.bin");
        std::fs::write(&path, vec![7u8; 10_000]).expect("write");

        let small = sha1_file(&path, 3).expect("hash");
        let large = sha1_file(&path, 65_536).expect("hash");
        assert_eq!(small, large);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        assert!(Fingerprint::compute(&dir.path().join("nope"), 4096).is_err());
    }
}
