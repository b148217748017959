//! Stable multi-key ordering of query matches.

use std::cmp::Ordering;
use std::str::FromStr;

use super::record::FileRecord;
use crate::error::FilefindError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Path,
    Extension,
    Hash,
    Size,
    Date,
    /// Path, then name, then extension.
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One `(field, direction)` sort key, written `size-` or `name+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    fn compare(&self, a: &FileRecord, b: &FileRecord) -> Ordering {
        let ordering = match self.field {
            SortField::Name => a.base_name.cmp(&b.base_name),
            SortField::Path => a.directory.cmp(&b.directory),
            SortField::Extension => a.extension.cmp(&b.extension),
            SortField::Hash => a.content_hash.cmp(&b.content_hash),
            SortField::Size => a.size.cmp(&b.size),
            SortField::Date => a.modified_at.cmp(&b.modified_at),
            SortField::Any => a
                .directory
                .cmp(&b.directory)
                .then_with(|| a.base_name.cmp(&b.base_name))
                .then_with(|| a.extension.cmp(&b.extension)),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortKey {
    type Err = FilefindError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (name, direction) = if let Some(name) = trimmed.strip_suffix('-') {
            (name, SortDirection::Descending)
        } else if let Some(name) = trimmed.strip_suffix('+') {
            (name, SortDirection::Ascending)
        } else {
            (trimmed, SortDirection::Ascending)
        };

        let field = match name.to_ascii_lowercase().as_str() {
            "name" => SortField::Name,
            "path" | "dir" => SortField::Path,
            "ext" | "extension" => SortField::Extension,
            "hash" => SortField::Hash,
            "size" => SortField::Size,
            "date" => SortField::Date,
            "any" => SortField::Any,
            _ => return Err(FilefindError::UnknownSortField(raw.to_string())),
        };
        Ok(Self::new(field, direction))
    }
}

/// Ordered list of sort keys; the first key dominates.
#[derive(Debug, Clone, Default)]
pub struct ReportSorter {
    keys: Vec<SortKey>,
}

impl ReportSorter {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, FilefindError> {
        raw.iter()
            .map(|key| key.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// One stable pass per key, last key first.
    pub fn sort(&self, records: &mut [FileRecord]) {
        for key in self.keys.iter().rev() {
            records.sort_by(|a, b| key.compare(a, b));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::Fingerprint;

    fn record(path: &str, size: u64) -> FileRecord {
        FileRecord::from_entry(path, &Fingerprint::new(size, "h", 0))
    }

    fn paths(records: &[FileRecord]) -> Vec<&str> {
        records.iter().map(|record| record.path.as_str()).collect()
    }

    #[test]
    fn parses_direction_suffixes() {
        let key: SortKey = "size-".parse().expect("key");
        assert_eq!(key, SortKey::new(SortField::Size, SortDirection::Descending));
        let key: SortKey = "name".parse().expect("key");
        assert_eq!(key.direction, SortDirection::Ascending);
        assert!("colour+".parse::<SortKey>().is_err());
    }

    #[test]
    fn first_key_dominates_and_ties_keep_later_order() {
        let mut records = vec![
            record("/d/b.txt", 5),
            record("/d/z.txt", 9),
            record("/d/a.txt", 5),
            record("/d/c.txt", 9),
        ];
        ReportSorter::parse(&["size-", "name+"])
            .expect("keys")
            .sort(&mut records);
        assert_eq!(
            paths(&records),
            ["/d/c.txt", "/d/z.txt", "/d/a.txt", "/d/b.txt"]
        );
    }

    #[test]
    fn equal_keys_preserve_encounter_order() {
        let mut records = vec![record("/x/same.a", 1), record("/y/same.b", 1)];
        ReportSorter::parse(&["size+"]).expect("keys").sort(&mut records);
        assert_eq!(paths(&records), ["/x/same.a", "/y/same.b"]);
    }

    #[test]
    fn any_orders_by_directory_then_name() {
        let mut records = vec![
            record("/b/a.txt", 1),
            record("/a/z.txt", 1),
            record("/a/m.txt", 1),
        ];
        ReportSorter::parse(&["any"]).expect("keys").sort(&mut records);
        assert_eq!(paths(&records), ["/a/m.txt", "/a/z.txt", "/b/a.txt"]);
    }
}
