//! File-backed datastore.
//!
//! The whole store is held in memory and persisted as one snapshot:
//! - Postcard encoding (compact binary format)
//! - Zstd compression
//! - Atomic write (temp file + rename)

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::memory::MemoryDatastore;
use super::{Datastore, PartitionIter};
use crate::error::{FilefindError, Result};
use crate::fingerprint::Fingerprint;
use crate::indexer::unix_now_secs;

/// Snapshot format version - increment when changing the format.
pub const STORE_SNAPSHOT_VERSION: u32 = 1;

const ZSTD_LEVEL: i32 = 6;

#[derive(Serialize, Deserialize)]
struct StoreSnapshot {
    version: u32,
    saved_at: u64,
    data: MemoryDatastore,
}

#[derive(Debug)]
pub struct SnapshotDatastore {
    path: PathBuf,
    data: MemoryDatastore,
    dirty: bool,
}

impl SnapshotDatastore {
    /// Opens the snapshot at `path`; a missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match load_snapshot(&path)? {
            Some(data) => data,
            None => MemoryDatastore::new(),
        };
        Ok(Self {
            path,
            data,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the store back to disk if anything changed since the last flush.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        write_snapshot(&self.path, &self.data)?;
        self.dirty = false;
        Ok(())
    }
}

impl Datastore for SnapshotDatastore {
    fn get(&self, partition: &str, path: &str) -> Result<Option<Fingerprint>> {
        self.data.get(partition, path)
    }

    fn set(&mut self, partition: &str, path: &str, fingerprint: Fingerprint) -> Result<()> {
        self.dirty = true;
        self.data.set(partition, path, fingerprint)
    }

    fn exists(&self, partition: &str) -> Result<bool> {
        self.data.exists(partition)
    }

    fn iterate<'a>(&'a self, partition: &str) -> Result<PartitionIter<'a>> {
        self.data.iterate(partition)
    }

    fn count(&self, partition: &str) -> Result<usize> {
        self.data.count(partition)
    }

    fn partition_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        self.data.partition_keys_with_prefix(prefix)
    }

    fn remember_listing(&mut self, items: &[String]) -> Result<()> {
        self.dirty = true;
        self.data.remember_listing(items)
    }

    fn listing(&self) -> Result<Vec<String>> {
        self.data.listing()
    }
}

fn load_snapshot(path: &Path) -> Result<Option<MemoryDatastore>> {
    let input = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error.into()),
    };

    let decoder = zstd::Decoder::new(input).map_err(|error| {
        FilefindError::Serialization(format!(
            "failed to decompress store {}: {error}",
            path.display()
        ))
    })?;
    let mut input = BufReader::new(decoder);
    let mut scratch = vec![0u8; 4 * 1024];

    let snapshot: StoreSnapshot = {
        let _span = tracing::info_span!("store_decode", path = %path.display()).entered();
        postcard::from_io((&mut input, &mut scratch))
            .map(|(snapshot, _)| snapshot)
            .map_err(|error| {
                FilefindError::Serialization(format!(
                    "failed to decode store {}: {error}",
                    path.display()
                ))
            })?
    };

    if snapshot.version != STORE_SNAPSHOT_VERSION {
        return Err(FilefindError::Serialization(format!(
            "store {} has version {}, expected {}",
            path.display(),
            snapshot.version,
            STORE_SNAPSHOT_VERSION
        )));
    }

    tracing::debug!(
        "loaded store from {} ({} entries, saved_at={})",
        path.display(),
        snapshot.data.total_entries(),
        snapshot.saved_at
    );
    Ok(Some(snapshot.data))
}

fn write_snapshot(path: &Path, data: &MemoryDatastore) -> Result<()> {
    let snapshot = StoreSnapshot {
        version: STORE_SNAPSHOT_VERSION,
        saved_at: unix_now_secs(),
        data: data.clone(),
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    {
        let output = File::create(&tmp_path)?;
        let encoder = zstd::Encoder::new(output, ZSTD_LEVEL)?;
        let mut output = BufWriter::new(encoder.auto_finish());
        postcard::to_io(&snapshot, &mut output).map_err(|error| {
            FilefindError::Serialization(format!("failed to encode store: {error}"))
        })?;
        output.flush()?;
    }

    fs::rename(&tmp_path, path)?;

    tracing::debug!(
        "wrote store to {} ({} entries)",
        path.display(),
        data.total_entries()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_snapshot_opens_empty() {
        let temp = TempDir::new().expect("tempdir");
        let store = SnapshotDatastore::open(temp.path().join("store.bin.zst")).expect("open");
        assert!(store.partition_keys_with_prefix("").expect("keys").is_empty());
    }

    #[test]
    fn flush_then_reopen_restores_entries() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("nested").join("store.bin.zst");

        let mut store = SnapshotDatastore::open(&path).expect("open");
        store
            .set("ns:m:/r:", "/r/a.txt", Fingerprint::new(3, "abc", 42))
            .expect("set");
        store
            .remember_listing(&["ns:m:/r:".to_string()])
            .expect("remember");
        store.flush().expect("flush");
        assert!(!path.with_extension("tmp").exists());

        let reopened = SnapshotDatastore::open(&path).expect("reopen");
        assert_eq!(
            reopened.get("ns:m:/r:", "/r/a.txt").expect("get"),
            Some(Fingerprint::new(3, "abc", 42))
        );
        assert_eq!(reopened.listing().expect("listing"), vec!["ns:m:/r:"]);
    }

    #[test]
    fn clean_store_does_not_write() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("store.bin.zst");
        let mut store = SnapshotDatastore::open(&path).expect("open");
        store.flush().expect("flush");
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_snapshot_is_rejected() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("store.bin.zst");
        fs::write(&path, b"not a snapshot").expect("write");

        match SnapshotDatastore::open(&path) {
            Err(FilefindError::Serialization(_)) => {}
            other => panic!("expected serialization error, got {other:?}"),
        }
    }
}
