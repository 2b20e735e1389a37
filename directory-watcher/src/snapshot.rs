//! Directory tree snapshots.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

use tracing::debug;
use walkdir::WalkDir;

use crate::filter::PathFilter;

/// A point-in-time mapping from file path to last-modification time.
///
/// Keys are rooted at the watch root, so the same file always maps to the
/// same key across snapshots of the same session.
pub type Snapshot = HashMap<PathBuf, SystemTime>;

/// Walks a directory subtree and records modification times for entries
/// that pass the filter.
///
/// Snapshotting is best-effort: any entry that cannot be read (permission
/// denied, vanished mid-walk, unreadable metadata) is skipped and the walk
/// continues. A root that is missing or unreadable produces an empty
/// snapshot rather than an error.
#[derive(Debug, Clone)]
pub struct TreeSnapshotter {
    root: PathBuf,
    filter: PathFilter,
    max_depth: Option<usize>,
    follow_symlinks: bool,
}

impl TreeSnapshotter {
    /// Create a snapshotter over `root`.
    pub fn new(root: impl Into<PathBuf>, filter: PathFilter) -> Self {
        Self {
            root: root.into(),
            filter,
            max_depth: None,
            follow_symlinks: false,
        }
    }

    /// Limit recursion depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Follow symbolic links while walking.
    pub fn follow_symlinks(mut self) -> Self {
        self.follow_symlinks = true;
        self
    }

    /// Take a snapshot of the subtree.
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();

        if !self.root.is_dir() {
            debug!(
                "watch root {} is not a readable directory, snapshot is empty",
                self.root.display()
            );
            return snapshot;
        }

        let mut walker = WalkDir::new(&self.root).follow_links(self.follow_symlinks);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("skipping unreadable entry: {err}");
                    continue;
                }
            };

            if !self.filter.matches(&entry) {
                continue;
            }

            let modified = match entry.metadata() {
                Ok(metadata) => match metadata.modified() {
                    Ok(modified) => modified,
                    Err(err) => {
                        debug!(
                            "skipping {}: no modification time: {err}",
                            entry.path().display()
                        );
                        continue;
                    }
                },
                Err(err) => {
                    debug!("skipping {}: unreadable metadata: {err}", entry.path().display());
                    continue;
                }
            };

            snapshot.insert(entry.into_path(), modified);
        }

        snapshot
    }
}
