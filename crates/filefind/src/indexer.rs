//! Incremental fingerprinting pipeline.
//!
//! - Change detection decides per path whether hashing is needed
//! - The builder walks a root and writes fingerprints to the datastore
//! - Progress and throughput are reported while the walk runs

mod build;
mod builder;
mod change;

pub use build::{unix_now_secs, BuildProgress, BuildReport, BuildStats};
pub use builder::IndexBuilder;
pub use change::{decide_by_size, ChangeDetector, Decision};
