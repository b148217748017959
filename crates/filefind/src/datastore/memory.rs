//! In-memory datastore.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Datastore, PartitionIter};
use crate::error::Result;
use crate::fingerprint::Fingerprint;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemoryDatastore {
    partitions: BTreeMap<String, BTreeMap<String, Fingerprint>>,
    listing: Vec<String>,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total fingerprints across all partitions.
    pub fn total_entries(&self) -> usize {
        self.partitions.values().map(BTreeMap::len).sum()
    }
}

impl Datastore for MemoryDatastore {
    fn get(&self, partition: &str, path: &str) -> Result<Option<Fingerprint>> {
        Ok(self
            .partitions
            .get(partition)
            .and_then(|entries| entries.get(path))
            .cloned())
    }

    fn set(&mut self, partition: &str, path: &str, fingerprint: Fingerprint) -> Result<()> {
        self.partitions
            .entry(partition.to_string())
            .or_default()
            .insert(path.to_string(), fingerprint);
        Ok(())
    }

    fn exists(&self, partition: &str) -> Result<bool> {
        Ok(self
            .partitions
            .get(partition)
            .is_some_and(|entries| !entries.is_empty()))
    }

    fn iterate<'a>(&'a self, partition: &str) -> Result<PartitionIter<'a>> {
        match self.partitions.get(partition) {
            Some(entries) => Ok(Box::new(
                entries
                    .iter()
                    .map(|(path, fingerprint)| (path.clone(), fingerprint.clone())),
            )),
            None => Ok(Box::new(std::iter::empty())),
        }
    }

    fn count(&self, partition: &str) -> Result<usize> {
        Ok(self.partitions.get(partition).map_or(0, BTreeMap::len))
    }

    fn partition_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .partitions
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(key, _)| key.clone())
            .collect())
    }

    fn remember_listing(&mut self, items: &[String]) -> Result<()> {
        self.listing = items.to_vec();
        Ok(())
    }

    fn listing(&self) -> Result<Vec<String>> {
        Ok(self.listing.clone())
    }
}
