//! Composable record predicates.
//!
//! Selection filters (name, path, any, ext, size, date) form one ordered
//! chain evaluated left to right with short-circuit AND. The work filter is
//! kept separate and only consulted once selection has succeeded.

use std::fmt;

use super::date_filter::{DateContext, DateFilter};
use super::record::FileRecord;
use super::size::SizeRange;
use super::text_filter::{StringFilter, StringPart};
use super::work::{WorkFilter, WorkPredicate};
use crate::config::FilefindConfig;
use crate::error::Result;

/// A boolean test over a file record.
pub type Predicate = Box<dyn Fn(&FileRecord) -> bool + Send + Sync>;

/// Raw user expressions for every selection filter.
#[derive(Debug, Clone, Default)]
pub struct SelectionCriteria {
    pub name: Option<String>,
    pub path: Option<String>,
    pub any: Option<String>,
    pub ext: Option<String>,
    pub size: Option<String>,
    pub date: Option<String>,
}

/// Ordered conjunction of selection filters.
///
/// With no filters every record is selected.
#[derive(Default)]
pub struct SelectionPredicate {
    filters: Vec<(&'static str, Predicate)>,
}

impl SelectionPredicate {
    pub fn select_all() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &'static str, predicate: Predicate) {
        self.filters.push((label, predicate));
    }

    /// Adds a string filter; blank expressions add nothing.
    pub fn add_string_filter(&mut self, part: StringPart, raw: &str, case_sensitive: bool) {
        if let Some(filter) = StringFilter::parse(part, raw, case_sensitive) {
            self.add(part.as_str(), Box::new(move |record| filter.matches(record)));
        }
    }

    pub fn add_size_filter(&mut self, raw: &str) -> Result<()> {
        let range = SizeRange::parse(raw)?;
        self.add("size", Box::new(move |record| range.matches(record.size)));
        Ok(())
    }

    pub fn add_date_filter(&mut self, raw: &str, context: &DateContext) -> Result<()> {
        let filter = DateFilter::parse(raw, context)?;
        self.add(
            "date",
            Box::new(move |record| filter.matches(record.modified_at)),
        );
        Ok(())
    }

    pub fn test(&self, record: &FileRecord) -> bool {
        self.filters.iter().all(|(_, predicate)| predicate(record))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.filters.iter().map(|(label, _)| *label)
    }
}

impl fmt::Debug for SelectionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

/// Selection chain plus work filter, combined only at evaluation time.
#[derive(Debug, Default)]
pub struct QueryPredicate {
    pub selection: SelectionPredicate,
    pub work: WorkPredicate,
}

impl QueryPredicate {
    pub fn new(selection: SelectionPredicate, work: WorkPredicate) -> Self {
        Self { selection, work }
    }

    /// The work filter never runs when selection already failed.
    pub fn test(&mut self, record: &FileRecord) -> bool {
        self.selection.test(record) && self.work.test(record)
    }
}

impl From<WorkPredicate> for QueryPredicate {
    fn from(work: WorkPredicate) -> Self {
        Self::new(SelectionPredicate::select_all(), work)
    }
}

/// Builds predicates from user criteria.
#[derive(Debug, Clone)]
pub struct PredicateEngine {
    case_sensitive: bool,
    dates: DateContext,
}

impl PredicateEngine {
    /// Captures today's date in the configured reference time zone.
    pub fn new(config: &FilefindConfig) -> Result<Self> {
        Ok(Self::with_date_context(config, DateContext::capture(config)?))
    }

    pub fn with_date_context(config: &FilefindConfig, dates: DateContext) -> Self {
        Self {
            case_sensitive: config.case_sensitive,
            dates,
        }
    }

    /// Filters are chained in a fixed order whatever order the criteria
    /// arrived in; any malformed size or date expression fails the build.
    pub fn build_selection_predicate(&self, criteria: &SelectionCriteria) -> Result<SelectionPredicate> {
        let mut predicate = SelectionPredicate::select_all();
        for (part, raw) in [
            (StringPart::Name, &criteria.name),
            (StringPart::Path, &criteria.path),
            (StringPart::Any, &criteria.any),
            (StringPart::Ext, &criteria.ext),
        ] {
            if let Some(raw) = raw {
                predicate.add_string_filter(part, raw, self.case_sensitive);
            }
        }
        if let Some(raw) = &criteria.size {
            predicate.add_size_filter(raw)?;
        }
        if let Some(raw) = &criteria.date {
            predicate.add_date_filter(raw, &self.dates)?;
        }
        tracing::debug!("selection predicate: {predicate:?}");
        Ok(predicate)
    }

    pub fn build_work_predicate(&self, name: &str) -> Result<WorkPredicate> {
        let filter: WorkFilter = name.parse()?;
        Ok(filter.predicate())
    }

    pub fn build(&self, criteria: &SelectionCriteria, work: &str) -> Result<QueryPredicate> {
        Ok(QueryPredicate::new(
            self.build_selection_predicate(criteria)?,
            self.build_work_predicate(work)?,
        ))
    }
}
