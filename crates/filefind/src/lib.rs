//! Filesystem fingerprint index and query library.
//!
//! This crate provides:
//! - Incremental fingerprinting of a directory tree (size, SHA-1, mtime)
//! - Partitioned fingerprint storage with a compressed snapshot backend
//! - Composable query predicates over stored fingerprints
//! - Numbered partition listings

pub mod config;
pub mod datastore;
pub mod error;
pub mod fingerprint;
pub mod indexer;
pub mod listing;
pub mod machine;
pub mod query;
pub mod walker;

// Re-export main types
pub use config::FilefindConfig;
pub use datastore::{Datastore, MemoryDatastore, PartitionKey, SnapshotDatastore};
pub use error::{FilefindError, Result};
pub use fingerprint::Fingerprint;
pub use indexer::{BuildReport, BuildStats, ChangeDetector, Decision, IndexBuilder};
pub use listing::{list_partitions, resolve_listing_id, ListingEntry};
pub use machine::local_machine_name;
pub use query::{
    FileRecord, PredicateEngine, QueryOutcome, QueryPredicate, QueryRunner, ReportSorter,
    SelectionCriteria, WorkFilter,
};
pub use walker::{FsWalker, ListWalker, Walker};
