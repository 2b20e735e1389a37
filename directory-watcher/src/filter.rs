//! Path filtering for snapshot inclusion.

use std::ffi::OsStr;
use std::path::Path;

use walkdir::DirEntry;

/// Extensions of theme asset files.
pub const THEME_ASSET_EXTENSIONS: &[&str] = &["js", "css"];

/// Decides whether a directory entry belongs in a snapshot.
///
/// An entry matches when it is a regular file and its extension,
/// lower-cased, is in the allow-list. Directories are never matched; the
/// walk descends into them regardless of the filter.
#[derive(Debug, Clone)]
pub struct PathFilter {
    /// Allowed extensions, lower-cased, without the leading dot.
    extensions: Vec<String>,
}

impl PathFilter {
    /// Create a filter from an extension allow-list. Leading dots are
    /// stripped and matching is case-insensitive.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .collect();

        Self { extensions }
    }

    /// The reference filter: theme asset files only.
    pub fn theme_assets() -> Self {
        Self::new(THEME_ASSET_EXTENSIONS.iter().copied())
    }

    /// Check whether a walked entry should be included in a snapshot.
    pub fn matches(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_file() && self.matches_path(entry.path())
    }

    /// Check a path's extension against the allow-list. Paths without an
    /// extension, and extensions that are not valid UTF-8, never match.
    pub fn matches_path(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(OsStr::to_str) else {
            return false;
        };
        let ext = ext.to_lowercase();

        self.extensions.iter().any(|allowed| *allowed == ext)
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::theme_assets()
    }
}
