//! Build statistics and progress tracking.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Counters for one build pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Candidates that survived junk exclusion.
    pub processed: usize,
    /// Fingerprints written.
    pub recomputed: usize,
    /// Candidates left untouched by change detection.
    pub skipped: usize,
    /// Candidates dropped by the junk signature.
    pub excluded: usize,
    /// Candidates that could not be stat-ed or hashed.
    pub errors: usize,
}

/// Progress of a running build, handed to progress observers.
#[derive(Debug, Clone)]
pub struct BuildProgress {
    pub stats: BuildStats,
    pub started_at: u64,
    started: Instant,
}

impl BuildProgress {
    pub fn start() -> Self {
        Self {
            stats: BuildStats::default(),
            started_at: unix_now_secs(),
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn files_per_second(&self) -> f64 {
        rate(self.stats.processed, self.elapsed())
    }

    pub fn finish(self) -> BuildReport {
        BuildReport {
            elapsed: self.started.elapsed(),
            started_at: self.started_at,
            finished_at: unix_now_secs(),
            stats: self.stats,
        }
    }
}

/// Final result of a build pass.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub stats: BuildStats,
    pub started_at: u64,
    pub finished_at: u64,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn files_per_second(&self) -> f64 {
        rate(self.stats.processed, self.elapsed)
    }
}

fn rate(count: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

/// Returns the current Unix timestamp in seconds.
pub fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}
