//! Named post-selection work filters.
//!
//! The registry is closed: names are resolved once, before a query pass
//! starts, and unknown names are rejected.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use super::record::FileRecord;
use crate::error::FilefindError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkFilter {
    /// Passes every record.
    #[default]
    All,
    /// Zero-byte files.
    Empty,
    /// Records whose content hash was already seen earlier in the pass.
    Duplicates,
    /// Paths that no longer exist on disk.
    Missing,
    /// Paths whose on-disk size differs from the stored fingerprint.
    Changed,
}

impl WorkFilter {
    pub const NAMES: &'static [&'static str] = &["all", "empty", "duplicates", "missing", "changed"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Empty => "empty",
            Self::Duplicates => "duplicates",
            Self::Missing => "missing",
            Self::Changed => "changed",
        }
    }

    /// Creates the per-pass predicate for this filter.
    pub fn predicate(self) -> WorkPredicate {
        WorkPredicate {
            filter: self,
            seen_hashes: HashSet::new(),
        }
    }
}

impl FromStr for WorkFilter {
    type Err = FilefindError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "empty" => Ok(Self::Empty),
            "duplicates" | "dupes" => Ok(Self::Duplicates),
            "missing" => Ok(Self::Missing),
            "changed" => Ok(Self::Changed),
            _ => Err(FilefindError::UnknownWorkFilter(raw.to_string())),
        }
    }
}

/// Stateful work predicate for one query pass.
#[derive(Debug, Clone)]
pub struct WorkPredicate {
    filter: WorkFilter,
    seen_hashes: HashSet<String>,
}

impl Default for WorkPredicate {
    fn default() -> Self {
        WorkFilter::All.predicate()
    }
}

impl WorkPredicate {
    pub fn filter(&self) -> WorkFilter {
        self.filter
    }

    pub fn test(&mut self, record: &FileRecord) -> bool {
        match self.filter {
            WorkFilter::All => true,
            WorkFilter::Empty => record.size == 0,
            WorkFilter::Duplicates => !self.seen_hashes.insert(record.content_hash.clone()),
            WorkFilter::Missing => !Path::new(&record.path).exists(),
            WorkFilter::Changed => match std::fs::metadata(&record.path) {
                Ok(metadata) => metadata.len() != record.size,
                Err(_) => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::Fingerprint;
    use tempfile::tempdir;

    fn record(path: &str, size: u64, hash: &str) -> FileRecord {
        FileRecord::from_entry(path, &Fingerprint::new(size, hash, 0))
    }

    #[test]
    fn names_resolve_to_variants() {
        for name in WorkFilter::NAMES {
            let filter: WorkFilter = name.parse().expect("known name");
            assert_eq!(filter.as_str(), *name);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        match "shred".parse::<WorkFilter>() {
            Err(FilefindError::UnknownWorkFilter(name)) => assert_eq!(name, "shred"),
            other => panic!("expected UnknownWorkFilter, got {other:?}"),
        }
    }

    #[test]
    fn duplicates_selects_second_and_later_copies() {
        let mut predicate = WorkFilter::Duplicates.predicate();
        assert!(!predicate.test(&record("/a/1.txt", 3, "same")));
        assert!(predicate.test(&record("/b/2.txt", 3, "same")));
        assert!(predicate.test(&record("/c/3.txt", 3, "same")));
        assert!(!predicate.test(&record("/d/4.txt", 3, "other")));
    }

    #[test]
    fn empty_selects_zero_byte_files() {
        let mut predicate = WorkFilter::Empty.predicate();
        assert!(predicate.test(&record("/a", 0, "h")));
        assert!(!predicate.test(&record("/b", 1, "h")));
    }

    #[test]
    fn missing_and_changed_inspect_the_disk() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("kept.txt");
        std::fs::write(&path, b"12345").expect("write");
        let path = path.to_string_lossy().replace('\\', "/");

        let current = record(&path, 5, "h");
        let stale = record(&path, 2, "h");
        let gone = record(&format!("{path}.gone"), 5, "h");

        let mut missing = WorkFilter::Missing.predicate();
        assert!(!missing.test(&current));
        assert!(missing.test(&gone));

        let mut changed = WorkFilter::Changed.predicate();
        assert!(!changed.test(&current));
        assert!(changed.test(&stale));
        assert!(!changed.test(&gone));
    }
}
