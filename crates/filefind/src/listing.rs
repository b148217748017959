//! Numbered partition listings.
//!
//! A listing enumerates the partitions of a namespace (optionally one
//! machine) and is remembered in the datastore so a later run can refer to a
//! partition by its 1-based position.

use crate::datastore::{validate_machine, Datastore, PartitionKey};
use crate::error::{FilefindError, Result};

/// One row of a partition listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// 1-based position, stable until the next listing is remembered.
    pub id: usize,
    pub key: String,
    pub entries: usize,
}

impl ListingEntry {
    /// Decoded key; `None` for keys written by something other than a build.
    pub fn partition(&self) -> Option<PartitionKey> {
        self.key.parse().ok()
    }
}

/// Lists partitions under `namespace`, or one machine in it, and remembers
/// the enumeration.
pub fn list_partitions<D: Datastore + ?Sized>(
    store: &mut D,
    namespace: &str,
    machine: Option<&str>,
) -> Result<Vec<ListingEntry>> {
    let prefix = match machine {
        Some(machine) => {
            validate_machine(machine)?;
            PartitionKey::machine_prefix(namespace, machine)
        }
        None => PartitionKey::namespace_prefix(namespace),
    };
    let keys = store.partition_keys_with_prefix(&prefix)?;

    let mut listing = Vec::with_capacity(keys.len());
    for (index, key) in keys.iter().enumerate() {
        listing.push(ListingEntry {
            id: index + 1,
            entries: store.count(key)?,
            key: key.clone(),
        });
    }

    store.remember_listing(&keys)?;
    tracing::debug!("remembered listing of {} partitions under {prefix}", keys.len());
    Ok(listing)
}

/// Resolves a 1-based listing id to the partition key it was remembered as.
pub fn resolve_listing_id<D: Datastore + ?Sized>(store: &D, raw_id: &str) -> Result<String> {
    let id: usize = raw_id
        .trim()
        .parse()
        .map_err(|_| FilefindError::InvalidListingId(raw_id.to_string()))?;
    let listing = store.listing()?;
    id.checked_sub(1)
        .and_then(|index| listing.get(index))
        .cloned()
        .ok_or(FilefindError::UnresolvedListingId(id))
}
