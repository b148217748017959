//! Drives a build pass: walk, exclude junk, detect changes, fingerprint.

use std::path::{Path, PathBuf};

use super::build::{BuildProgress, BuildReport};
use super::change::{ChangeDetector, Decision};
use crate::config::FilefindConfig;
use crate::datastore::{Datastore, PartitionKey};
use crate::error::{FilefindError, Result};
use crate::fingerprint::Fingerprint;
use crate::walker::Walker;

type ProgressCallback<'a> = Box<dyn FnMut(&BuildProgress) + 'a>;

/// Writes fingerprints for one (machine, root) partition.
pub struct IndexBuilder<'a, D: Datastore + ?Sized> {
    config: &'a FilefindConfig,
    store: &'a mut D,
    detector: ChangeDetector,
    on_progress: Option<ProgressCallback<'a>>,
}

impl<'a, D: Datastore + ?Sized> IndexBuilder<'a, D> {
    pub fn new(config: &'a FilefindConfig, store: &'a mut D) -> Self {
        Self {
            config,
            store,
            detector: ChangeDetector::new(),
            on_progress: None,
        }
    }

    /// Called every `build_progress_interval` processed candidates.
    pub fn with_progress(mut self, callback: impl FnMut(&BuildProgress) + 'a) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Resolves `root` to the directory and partition key a build would use.
    pub fn resolve_root(&self, root: &Path, machine: &str) -> Result<(PathBuf, PartitionKey)> {
        if !root.is_dir() {
            return Err(FilefindError::DirectoryNotFound(root.to_path_buf()));
        }
        let root = std::fs::canonicalize(root)?;
        let root_str = root
            .to_str()
            .ok_or_else(|| FilefindError::InvalidPartitionKey(root.display().to_string()))?;
        let key = PartitionKey::for_machine(self.config.namespace.as_str(), machine, root_str)?;
        Ok((root, key))
    }

    /// Walks `root` and brings its partition up to date.
    ///
    /// Single items that cannot be stat-ed or hashed are logged and counted;
    /// only a missing root or a datastore failure aborts the pass.
    pub fn build(&mut self, root: &Path, machine: &str, walker: &dyn Walker) -> Result<BuildReport> {
        let (root, key) = self.resolve_root(root, machine)?;
        let partition = key.to_string();
        let junk = self.config.junk_signature.as_str();
        let interval = self.config.build_progress_interval.max(1);

        tracing::info!(machine, root = %root.display(), "beginning build");
        let mut progress = BuildProgress::start();

        for candidate in walker.walk(&root) {
            let Some(path) = candidate.to_str() else {
                tracing::warn!("skipping non UTF-8 path: {}", candidate.display());
                progress.stats.processed += 1;
                progress.stats.errors += 1;
                continue;
            };
            if !junk.is_empty() && path.contains(junk) {
                progress.stats.excluded += 1;
                continue;
            }
            progress.stats.processed += 1;

            self.process(&partition, &candidate, path, &mut progress)?;

            if progress.stats.processed % interval == 0 {
                tracing::info!(
                    processed = progress.stats.processed,
                    recomputed = progress.stats.recomputed,
                    rate = format_args!("{:.0}/s", progress.files_per_second()),
                    "build progress"
                );
                if let Some(callback) = self.on_progress.as_mut() {
                    callback(&progress);
                }
            }
        }

        let report = progress.finish();
        tracing::info!(
            processed = report.stats.processed,
            recomputed = report.stats.recomputed,
            skipped = report.stats.skipped,
            excluded = report.stats.excluded,
            errors = report.stats.errors,
            rate = format_args!("{:.0}/s", report.files_per_second()),
            "build finished"
        );
        Ok(report)
    }

    fn process(
        &mut self,
        partition: &str,
        candidate: &Path,
        path: &str,
        progress: &mut BuildProgress,
    ) -> Result<()> {
        let existing = self.store.get(partition, path)?;
        let decision = match self.detector.decide(candidate, existing.as_ref()) {
            Ok(decision) => decision,
            Err(error) => {
                tracing::warn!("cannot stat {path}: {error}");
                progress.stats.errors += 1;
                return Ok(());
            }
        };

        if decision == Decision::Skip {
            tracing::debug!("unchanged {path}");
            progress.stats.skipped += 1;
            return Ok(());
        }

        match Fingerprint::compute(candidate, self.config.hash_chunk_size) {
            Ok(fingerprint) => {
                tracing::debug!("fingerprinted {path} ({} bytes)", fingerprint.size);
                self.store.set(partition, path, fingerprint)?;
                progress.stats.recomputed += 1;
            }
            Err(error) => {
                tracing::warn!("cannot fingerprint {path}: {error}");
                progress.stats.errors += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::MemoryDatastore;
    use crate::walker::{FsWalker, ListWalker};
    use std::fs;
    use tempfile::TempDir;

    fn config() -> FilefindConfig {
        FilefindConfig {
            namespace: "test".to_string(),
            ..FilefindConfig::default()
        }
    }

    #[test]
    fn missing_root_is_fatal() {
        let temp = TempDir::new().expect("tempdir");
        let config = config();
        let mut store = MemoryDatastore::new();
        let result = IndexBuilder::new(&config, &mut store).build(
            &temp.path().join("absent"),
            "m",
            &FsWalker::new(),
        );
        match result {
            Err(FilefindError::DirectoryNotFound(_)) => {}
            other => panic!("expected DirectoryNotFound, got {other:?}"),
        }
    }

    #[test]
    fn machine_with_colon_is_fatal_before_walking() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("a.txt"), b"a").expect("write");
        let config = config();
        let mut store = MemoryDatastore::new();
        let result = IndexBuilder::new(&config, &mut store).build(temp.path(), "a:b", &FsWalker::new());
        match result {
            Err(FilefindError::InvalidMachineName(name)) => assert_eq!(name, "a:b"),
            other => panic!("expected InvalidMachineName, got {other:?}"),
        }
        assert_eq!(store.total_entries(), 0);
    }

    #[test]
    fn junk_paths_are_excluded() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("keep.txt"), b"k").expect("write");
        fs::write(temp.path().join("._keep.txt"), b"resource fork").expect("write");

        let config = config();
        let mut store = MemoryDatastore::new();
        let report = IndexBuilder::new(&config, &mut store)
            .build(temp.path(), "m", &FsWalker::new())
            .expect("build");

        assert_eq!(report.stats.processed, 1);
        assert_eq!(report.stats.excluded, 1);
        assert_eq!(report.stats.recomputed, 1);
    }

    #[test]
    fn unstatable_candidate_is_skipped_not_fatal() {
        let temp = TempDir::new().expect("tempdir");
        let root = fs::canonicalize(temp.path()).expect("canonicalize");
        fs::write(root.join("real.txt"), b"data").expect("write");

        let config = config();
        let mut store = MemoryDatastore::new();
        let walker = ListWalker::new(vec![root.join("ghost.txt"), root.join("real.txt")]);
        let report = IndexBuilder::new(&config, &mut store)
            .build(&root, "m", &walker)
            .expect("build");

        assert_eq!(report.stats.processed, 2);
        assert_eq!(report.stats.errors, 1);
        assert_eq!(report.stats.recomputed, 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_candidate_is_skipped_not_stored() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().expect("tempdir");
        let root = fs::canonicalize(temp.path()).expect("canonicalize");
        let raw = root.join(OsStr::from_bytes(b"caf\xe9.txt"));
        fs::write(&raw, b"latin-1 name").expect("write");

        let config = config();
        let mut store = MemoryDatastore::new();
        let report = IndexBuilder::new(&config, &mut store)
            .build(&root, "m", &ListWalker::new(vec![raw]))
            .expect("build");

        assert_eq!(report.stats.errors, 1);
        assert_eq!(report.stats.recomputed, 0);
        assert_eq!(store.total_entries(), 0);
    }

    #[test]
    fn size_change_triggers_recompute_on_rerun() {
        let temp = TempDir::new().expect("tempdir");
        let file = temp.path().join("grow.txt");
        fs::write(&file, b"one").expect("write");

        let config = config();
        let mut store = MemoryDatastore::new();
        IndexBuilder::new(&config, &mut store)
            .build(temp.path(), "m", &FsWalker::new())
            .expect("first build");

        fs::write(&file, b"three").expect("rewrite");
        let report = IndexBuilder::new(&config, &mut store)
            .build(temp.path(), "m", &FsWalker::new())
            .expect("second build");
        assert_eq!(report.stats.recomputed, 1);
        assert_eq!(report.stats.skipped, 0);

        let (_, key) = IndexBuilder::new(&config, &mut store)
            .resolve_root(temp.path(), "m")
            .expect("resolve");
        let canonical = fs::canonicalize(&file).expect("canonicalize");
        let stored = store
            .get(&key.to_string(), &canonical.to_string_lossy())
            .expect("get")
            .expect("fingerprint");
        assert_eq!(stored.size, 5);
    }

    #[test]
    fn same_size_edit_is_not_detected() {
        let temp = TempDir::new().expect("tempdir");
        let file = temp.path().join("same.txt");
        fs::write(&file, b"aaaa").expect("write");

        let config = config();
        let mut store = MemoryDatastore::new();
        IndexBuilder::new(&config, &mut store)
            .build(temp.path(), "m", &FsWalker::new())
            .expect("first build");

        fs::write(&file, b"bbbb").expect("rewrite");
        let report = IndexBuilder::new(&config, &mut store)
            .build(temp.path(), "m", &FsWalker::new())
            .expect("second build");
        assert_eq!(report.stats.recomputed, 0);
        assert_eq!(report.stats.skipped, 1);
    }

    #[test]
    fn progress_callback_fires_on_interval() {
        let temp = TempDir::new().expect("tempdir");
        for index in 0..5 {
            fs::write(temp.path().join(format!("f{index}")), b"x").expect("write");
        }

        let config = FilefindConfig {
            build_progress_interval: 2,
            ..config()
        };
        let mut store = MemoryDatastore::new();
        let mut signals = Vec::new();
        IndexBuilder::new(&config, &mut store)
            .with_progress(|progress| signals.push(progress.stats.processed))
            .build(temp.path(), "m", &FsWalker::new())
            .expect("build");
        assert_eq!(signals, vec![2, 4]);
    }
}
