//! Candidate-path sources for the index builder.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// Produces a lazy, finite sequence of file paths under a root.
pub trait Walker {
    fn walk(&self, root: &Path) -> Box<dyn Iterator<Item = PathBuf>>;
}

/// Sequential directory walk yielding regular files.
///
/// Hidden files and VCS-ignored files are included. Unreadable entries and
/// paths that are not valid UTF-8 are logged and dropped.
#[derive(Debug, Clone, Default)]
pub struct FsWalker {
    follow_links: bool,
}

impl FsWalker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

impl Walker for FsWalker {
    fn walk(&self, root: &Path) -> Box<dyn Iterator<Item = PathBuf>> {
        let walk = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(self.follow_links)
            .build();
        Box::new(walk.filter_map(|entry| match entry {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|kind| kind.is_file()) {
                    return None;
                }
                if entry.path().to_str().is_none() {
                    tracing::warn!("skipping non UTF-8 path: {}", entry.path().display());
                    return None;
                }
                Some(entry.into_path())
            }
            Err(error) => {
                tracing::warn!("skipping unreadable entry: {error}");
                None
            }
        }))
    }
}

/// Fixed list of paths, for callers that already know their candidates.
#[derive(Debug, Clone, Default)]
pub struct ListWalker {
    paths: Vec<PathBuf>,
}

impl ListWalker {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl Walker for ListWalker {
    fn walk(&self, root: &Path) -> Box<dyn Iterator<Item = PathBuf>> {
        let root = root.to_path_buf();
        Box::new(
            self.paths
                .clone()
                .into_iter()
                .filter(move |path| path.starts_with(&root)),
        )
    }
}
