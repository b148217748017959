//! Key-value storage for fingerprints.
//!
//! Fingerprints are grouped into partitions addressed by a string key (see
//! [`PartitionKey`]). The store also keeps one auxiliary ordered list that
//! remembers the last listing so a small integer id can be resolved back to
//! a partition key later.

mod memory;
mod partition;
mod snapshot;

pub use memory::MemoryDatastore;
pub use partition::{validate_machine, PartitionKey};
pub use snapshot::{SnapshotDatastore, STORE_SNAPSHOT_VERSION};

use crate::error::Result;
use crate::fingerprint::Fingerprint;

/// Lazy sequence of `(path, fingerprint)` pairs from one partition.
pub type PartitionIter<'a> = Box<dyn Iterator<Item = (String, Fingerprint)> + 'a>;

/// Storage contract consumed by the build and query pipelines.
///
/// Implementations are single-writer; no locking is performed.
pub trait Datastore {
    fn get(&self, partition: &str, path: &str) -> Result<Option<Fingerprint>>;
    fn set(&mut self, partition: &str, path: &str, fingerprint: Fingerprint) -> Result<()>;
    fn exists(&self, partition: &str) -> Result<bool>;
    /// Iteration order is whatever the backend yields.
    fn iterate<'a>(&'a self, partition: &str) -> Result<PartitionIter<'a>>;
    fn count(&self, partition: &str) -> Result<usize>;
    /// Ordered partition keys starting with `prefix`.
    fn partition_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
    /// Replaces the remembered listing.
    fn remember_listing(&mut self, items: &[String]) -> Result<()>;
    fn listing(&self) -> Result<Vec<String>>;
}
