//! Configuration types for directory watching.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatcherError};
use crate::filter::THEME_ASSET_EXTENSIONS;

/// Configuration for one watched directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Root of the watched subtree.
    pub root: PathBuf,

    /// Time between poll cycles.
    pub interval: Duration,

    /// Extension allow-list for snapshot inclusion (case-insensitive).
    pub extensions: Vec<String>,

    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl WatchConfig {
    /// Create a config with the reference defaults: one-second polling
    /// over theme asset files.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            interval: Duration::from_millis(1000),
            extensions: Self::default_extensions(),
            max_depth: None,
            follow_symlinks: false,
        }
    }

    /// Set the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Replace the extension allow-list.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the maximum recursion depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Enable following symbolic links.
    pub fn follow_symlinks(mut self) -> Self {
        self.follow_symlinks = true;
        self
    }

    /// Validate registration arguments. Called before a worker is spawned;
    /// a missing root directory is not an error (the first snapshot is
    /// simply empty), but malformed arguments are rejected here.
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(WatcherError::Config("root path is empty".to_string()));
        }

        if self.interval.is_zero() {
            return Err(WatcherError::Config(
                "poll interval must be positive".to_string(),
            ));
        }

        if self.extensions.is_empty() {
            return Err(WatcherError::Config(
                "extension allow-list is empty".to_string(),
            ));
        }

        Ok(())
    }

    fn default_extensions() -> Vec<String> {
        THEME_ASSET_EXTENSIONS
            .iter()
            .map(|ext| (*ext).to_string())
            .collect()
    }
}
