use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FilefindError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File directory does not exist -> {0}")]
    DirectoryNotFound(PathBuf),

    #[error("invalid size expression {expression:?}: {reason}")]
    InvalidSize { expression: String, reason: String },

    #[error("invalid date expression {expression:?}: {reason}")]
    InvalidDate { expression: String, reason: String },

    #[error("unknown work filter: {0}")]
    UnknownWorkFilter(String),

    #[error("unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("listing id must be an integer, got {0:?}")]
    InvalidListingId(String),

    #[error("listing id {0} does not match any remembered listing entry")]
    UnresolvedListingId(usize),

    #[error("partition not found: {0}")]
    PartitionNotFound(String),

    #[error("invalid machine name {0:?}: must be non-empty and free of ':'")]
    InvalidMachineName(String),

    #[error("invalid partition key: {0}")]
    InvalidPartitionKey(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FilefindError>;

impl FilefindError {
    pub(crate) fn invalid_size(expression: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSize {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_date(expression: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}
