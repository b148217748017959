//! Decides whether a path needs a fresh fingerprint.

use std::io;
use std::path::Path;

use crate::fingerprint::Fingerprint;

/// Outcome of a change check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip,
    Recompute,
}

/// Size-only change detection.
///
/// A path is recomputed when it has no fingerprint yet or its on-disk size
/// differs from the stored one. Modification time is not consulted, so a
/// content change that keeps the size identical goes unnoticed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector;

impl ChangeDetector {
    pub fn new() -> Self {
        Self
    }

    /// Stats `path` only when an existing fingerprint must be compared.
    pub fn decide(&self, path: &Path, existing: Option<&Fingerprint>) -> io::Result<Decision> {
        let Some(existing) = existing else {
            return Ok(Decision::Recompute);
        };
        let current_size = std::fs::metadata(path)?.len();
        Ok(decide_by_size(existing, current_size))
    }
}

pub fn decide_by_size(existing: &Fingerprint, current_size: u64) -> Decision {
    if existing.size == current_size {
        Decision::Skip
    } else {
        Decision::Recompute
    }
}
