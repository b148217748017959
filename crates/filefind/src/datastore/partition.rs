use std::fmt;
use std::str::FromStr;

use crate::error::{FilefindError, Result};

/// Identifies the partition of one (machine, root directory) pair.
///
/// The string form `"<namespace>:<machine>:<root>:"` is persisted and must
/// stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    pub namespace: String,
    pub machine: String,
    pub root: String,
}

impl PartitionKey {
    pub fn new(
        namespace: impl Into<String>,
        machine: impl Into<String>,
        root: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            machine: machine.into(),
            root: root.into(),
        }
    }

    /// Builds a key for a build or listing, rejecting a machine name that
    /// would shift the key's components.
    pub fn for_machine(
        namespace: impl Into<String>,
        machine: &str,
        root: impl Into<String>,
    ) -> Result<Self> {
        validate_machine(machine)?;
        Ok(Self::new(namespace, machine, root))
    }

    /// Prefix shared by every partition in `namespace`.
    pub fn namespace_prefix(namespace: &str) -> String {
        format!("{namespace}:")
    }

    /// Prefix shared by every partition of `machine` in `namespace`.
    pub fn machine_prefix(namespace: &str, machine: &str) -> String {
        format!("{namespace}:{machine}:")
    }
}

/// Machine names delimit partition keys, so they may not contain `:`.
pub fn validate_machine(machine: &str) -> Result<()> {
    if machine.is_empty() || machine.contains(':') {
        return Err(FilefindError::InvalidMachineName(machine.to_string()));
    }
    Ok(())
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:", self.namespace, self.machine, self.root)
    }
}

impl FromStr for PartitionKey {
    type Err = FilefindError;

    /// Namespace and machine never contain `:`; the root may (drive letters).
    fn from_str(raw: &str) -> Result<Self> {
        let invalid = || FilefindError::InvalidPartitionKey(raw.to_string());
        let body = raw.strip_suffix(':').ok_or_else(invalid)?;
        let mut parts = body.splitn(3, ':');
        let namespace = parts.next().filter(|part| !part.is_empty());
        let machine = parts.next().filter(|part| !part.is_empty());
        let root = parts.next().filter(|part| !part.is_empty());
        match (namespace, machine, root) {
            (Some(namespace), Some(machine), Some(root)) => {
                Ok(Self::new(namespace, machine, root))
            }
            _ => Err(invalid()),
        }
    }
}
