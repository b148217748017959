//! Query-time view of a stored path and its fingerprint.

use crate::fingerprint::Fingerprint;

/// Decomposition of one `(path, Fingerprint)` pair.
///
/// Never persisted; rebuilt on every query pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// The stored path, as written by the build.
    pub path: String,
    pub directory: String,
    /// File name without its extension.
    pub base_name: String,
    /// Lowercased extension without the leading dot; empty when absent.
    pub extension: String,
    pub size: u64,
    pub content_hash: String,
    pub modified_at: i64,
}

impl FileRecord {
    pub fn from_entry(path: &str, fingerprint: &Fingerprint) -> Self {
        let (directory, file_name) = split_directory(path);
        let (base_name, extension) = split_extension(file_name);
        Self {
            path: path.to_string(),
            directory: directory.to_string(),
            base_name: base_name.to_string(),
            extension: sanitize_extension(extension),
            size: fingerprint.size,
            content_hash: fingerprint.content_hash.clone(),
            modified_at: fingerprint.modified_at,
        }
    }

    /// File name with its original extension casing.
    pub fn file_name(&self) -> &str {
        split_directory(self.path.as_str()).1
    }
}

fn split_directory(path: &str) -> (&str, &str) {
    match path.rfind(['/', '\\']) {
        Some(0) => (&path[..1], &path[1..]),
        Some(split) => (&path[..split], &path[split + 1..]),
        None => ("", path),
    }
}

/// Leading-dot names (`.bashrc`) have no extension.
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(split) if split > 0 => (&file_name[..split], &file_name[split + 1..]),
        _ => (file_name, ""),
    }
}

pub fn sanitize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str) -> FileRecord {
        FileRecord::from_entry(path, &Fingerprint::new(10, "hash", 100))
    }

    #[test]
    fn splits_directory_base_and_extension() {
        let record = record("/home/me/photos/Beach.JPG");
        assert_eq!(record.directory, "/home/me/photos");
        assert_eq!(record.base_name, "Beach");
        assert_eq!(record.extension, "jpg");
        assert_eq!(record.size, 10);
    }

    #[test]
    fn only_last_dot_separates_extension() {
        let record = record("/srv/backup.tar.gz");
        assert_eq!(record.base_name, "backup.tar");
        assert_eq!(record.extension, "gz");
    }

    #[test]
    fn dotfiles_have_no_extension() {
        let record = record("/home/me/.bashrc");
        assert_eq!(record.base_name, ".bashrc");
        assert_eq!(record.extension, "");
    }

    #[test]
    fn file_at_filesystem_root() {
        let record = record("/notes");
        assert_eq!(record.directory, "/");
        assert_eq!(record.base_name, "notes");
        assert_eq!(record.file_name(), "notes");
    }

    #[test]
    fn stored_path_keeps_original_casing() {
        let record = record("/a/b/c.Txt");
        assert_eq!(record.path, "/a/b/c.Txt");
        assert_eq!(record.file_name(), "c.Txt");
        assert_eq!(record.extension, "txt");
    }
}
