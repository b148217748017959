//! Runtime configuration shared by the build and query pipelines.
//!
//! Store location, reference time zone and open-range sentinels live here
//! and are handed to the components that need them at construction.

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{FilefindError, Result};

pub const DEFAULT_NAMESPACE: &str = "filefind";
pub const DEFAULT_JUNK_SIGNATURE: &str = "/._";
pub const DEFAULT_BUILD_PROGRESS_INTERVAL: usize = 10_000;
pub const DEFAULT_QUERY_PROGRESS_INTERVAL: usize = 100_000;
pub const DEFAULT_HASH_CHUNK_SIZE: usize = 4096;

/// 9999-12-31T23:59:59Z.
pub const DEFAULT_RANGE_CEILING: i64 = 253_402_300_799;

const STORE_FILENAME: &str = "store.bin.zst";
const CONFIG_FILENAME: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilefindConfig {
    /// First component of every partition key.
    pub namespace: String,
    /// Location of the persisted datastore snapshot.
    pub store_path: PathBuf,
    /// Paths containing this substring are never indexed.
    pub junk_signature: String,
    pub build_progress_interval: usize,
    pub query_progress_interval: usize,
    /// Offset of the reference time zone used for every date computation.
    pub utc_offset_seconds: i32,
    /// Lower bound used for date ranges without a start.
    pub range_floor: i64,
    /// Upper bound used for date ranges without an end.
    pub range_ceiling: i64,
    /// Applies to `name` and `path` filters only.
    pub case_sensitive: bool,
    pub hash_chunk_size: usize,
}

impl Default for FilefindConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            store_path: default_store_path(),
            junk_signature: DEFAULT_JUNK_SIGNATURE.to_string(),
            build_progress_interval: DEFAULT_BUILD_PROGRESS_INTERVAL,
            query_progress_interval: DEFAULT_QUERY_PROGRESS_INTERVAL,
            utc_offset_seconds: 0,
            range_floor: 0,
            range_ceiling: DEFAULT_RANGE_CEILING,
            case_sensitive: false,
            hash_chunk_size: DEFAULT_HASH_CHUNK_SIZE,
        }
    }
}

impl FilefindConfig {
    /// Loads a JSON config file, falling back to defaults when it is absent.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(FilefindError::Config(format!(
                    "failed to read config {}: {error}",
                    path.display()
                )))
            }
        };
        let config: Self = serde_json::from_str(&data).map_err(|error| {
            FilefindError::Config(format!(
                "failed to parse config {}: {error}",
                path.display()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() || self.namespace.contains(':') {
            return Err(FilefindError::Config(format!(
                "namespace must be non-empty and free of ':' (got {:?})",
                self.namespace
            )));
        }
        if self.range_floor > self.range_ceiling {
            return Err(FilefindError::Config(
                "range_floor must not exceed range_ceiling".to_string(),
            ));
        }
        if self.hash_chunk_size == 0 {
            return Err(FilefindError::Config(
                "hash_chunk_size must be positive".to_string(),
            ));
        }
        self.reference_offset().map(|_| ())
    }

    /// The fixed reference time zone.
    pub fn reference_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
            FilefindError::Config(format!(
                "utc_offset_seconds out of range: {}",
                self.utc_offset_seconds
            ))
        })
    }
}

/// `<config dir>/filefind/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_NAMESPACE)
        .join(CONFIG_FILENAME)
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_NAMESPACE)
        .join(STORE_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let config = FilefindConfig::load(&dir.path().join("absent.json")).expect("load");
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.build_progress_interval, 10_000);
        assert_eq!(config.query_progress_interval, 100_000);
        assert!(!config.case_sensitive);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "namespace": "ff", "utc_offset_seconds": -18000 }"#)
            .expect("write config");

        let config = FilefindConfig::load(&path).expect("load");
        assert_eq!(config.namespace, "ff");
        assert_eq!(config.utc_offset_seconds, -18000);
        assert_eq!(config.junk_signature, DEFAULT_JUNK_SIGNATURE);
        assert_eq!(
            config.reference_offset().expect("offset").local_minus_utc(),
            -18000
        );
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("write config");

        match FilefindConfig::load(&path) {
            Err(FilefindError::Config(_)) => {}
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn namespace_with_separator_is_rejected() {
        let config = FilefindConfig {
            namespace: "a:b".to_string(),
            ..FilefindConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
