//! Streams one partition through a composed predicate.

use std::time::{Duration, Instant};

use super::predicate::QueryPredicate;
use super::record::FileRecord;
use crate::config::FilefindConfig;
use crate::datastore::Datastore;
use crate::error::{FilefindError, Result};

/// Matches of one query pass, in encounter order, plus its counters.
#[derive(Debug, Clone, Default)]
pub struct QueryOutcome {
    pub matches: Vec<FileRecord>,
    /// Records pulled from the partition.
    pub read: usize,
    /// Records that passed both selection and work filters.
    pub selected: usize,
    pub elapsed: Duration,
}

/// Read-only query pass over a datastore.
pub struct QueryRunner<'a, D: Datastore + ?Sized> {
    config: &'a FilefindConfig,
    store: &'a D,
}

impl<'a, D: Datastore + ?Sized> QueryRunner<'a, D> {
    pub fn new(config: &'a FilefindConfig, store: &'a D) -> Self {
        Self { config, store }
    }

    /// Evaluates `predicate` against every record of `partition`.
    ///
    /// An unknown partition fails before any record is read.
    pub fn run(&self, partition: &str, predicate: &mut QueryPredicate) -> Result<QueryOutcome> {
        if !self.store.exists(partition)? {
            return Err(FilefindError::PartitionNotFound(partition.to_string()));
        }

        let interval = self.config.query_progress_interval.max(1);
        let started = Instant::now();
        let mut outcome = QueryOutcome::default();

        tracing::info!(partition, "beginning query");
        for (path, fingerprint) in self.store.iterate(partition)? {
            outcome.read += 1;
            let record = FileRecord::from_entry(&path, &fingerprint);
            if predicate.test(&record) {
                outcome.selected += 1;
                outcome.matches.push(record);
            }

            if outcome.read % interval == 0 {
                tracing::info!(
                    read = outcome.read,
                    selected = outcome.selected,
                    "query progress"
                );
            }
        }

        outcome.elapsed = started.elapsed();
        tracing::info!(
            read = outcome.read,
            selected = outcome.selected,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "query finished"
        );
        Ok(outcome)
    }
}
