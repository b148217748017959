//! Composable query engine.
//!
//! - Records are decomposed into directory, base name and extension
//! - Selection filters (string, size, date) are chained with short-circuit AND
//! - A named work filter runs only after selection succeeded
//! - Matches are ordered by a stable multi-key sort for presentation

mod date_filter;
mod ext_class;
mod predicate;
mod record;
mod runner;
mod size;
mod sort;
mod text_filter;
mod work;

pub use date_filter::{DateContext, DateFilter, DateFilterKind, DateRange, DateTemplate};
pub use ext_class::{expand_extension_classes, lookup_extension_class};
pub use predicate::{
    Predicate, PredicateEngine, QueryPredicate, SelectionCriteria, SelectionPredicate,
};
pub use record::{sanitize_extension, FileRecord};
pub use runner::{QueryOutcome, QueryRunner};
pub use size::SizeRange;
pub use sort::{ReportSorter, SortDirection, SortField, SortKey};
pub use text_filter::{StringFilter, StringPart, TokenMode};
pub use work::{WorkFilter, WorkPredicate};
