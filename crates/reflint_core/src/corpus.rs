//! Corpus selection: which files a validation pass reads.
//!
//! A [`Corpus`] is a validated scan root plus an optional externally supplied
//! changed-file list. Selection is driven by [`FileScope`]s (extension set +
//! optional subpath filter); directories that are presumed non-authoritative
//! for symbol definitions are skipped everywhere.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::ValidatorError;

/// Directory names that never contribute symbol occurrences.
pub const IGNORED_DIRS: &[&str] = &["gfx", "tools", "resources", "docs", "map"];

/// A file-selection predicate: extension set plus an optional substring that
/// must appear in the root-relative path.
#[derive(Debug, Clone, Copy)]
pub struct FileScope {
    pub extensions: &'static [&'static str],
    pub subpath: Option<&'static str>,
}

impl FileScope {
    /// All files with one of the given extensions, anywhere under the root.
    pub const fn of(extensions: &'static [&'static str]) -> Self {
        Self {
            extensions,
            subpath: None,
        }
    }

    /// Files with one of the given extensions whose relative path contains
    /// `subpath`.
    pub const fn under(extensions: &'static [&'static str], subpath: &'static str) -> Self {
        Self {
            extensions,
            subpath: Some(subpath),
        }
    }

    fn matches(&self, path: &Path, relative: &str) -> bool {
        let ext_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| *x == e));
        ext_ok && self.subpath.is_none_or(|s| relative.contains(s))
    }
}

/// A validated scan root, optionally narrowed to a changed-file list.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    staged: Option<Vec<PathBuf>>,
}

impl Corpus {
    /// Opens a corpus rooted at `root`.
    ///
    /// The root must exist and be a directory; anything else is fatal before
    /// any scanning happens.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ValidatorError> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(ValidatorError::RootMissing(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ValidatorError::RootNotDirectory(root.to_path_buf()));
        }
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        Ok(Self { root, staged: None })
    }

    /// Narrows selection to an externally discovered changed-file list.
    ///
    /// Only [`Corpus::files`] honors the list; [`Corpus::walk`] always covers
    /// the full tree.
    pub fn with_staged(mut self, staged: Vec<PathBuf>) -> Self {
        self.staged = Some(staged);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_staged(&self) -> bool {
        self.staged.is_some()
    }

    /// The candidate files for the given scopes, honoring the staged list
    /// when one is attached.
    pub fn files(&self, scopes: &[FileScope]) -> Vec<PathBuf> {
        match &self.staged {
            Some(staged) => staged
                .iter()
                .filter(|p| self.selectable(p, scopes))
                .cloned()
                .collect(),
            None => self.walk(scopes),
        }
    }

    /// Walks the full tree for the given scopes, ignoring any staged list.
    ///
    /// Entries are visited in file-name order so repeated runs over an
    /// unchanged tree yield identical reports.
    pub fn walk(&self, scopes: &[FileScope]) -> Vec<PathBuf> {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| self.selectable(p, scopes))
            .collect()
    }

    /// The root-relative display form of `path`.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    fn selectable(&self, path: &Path, scopes: &[FileScope]) -> bool {
        if self.is_ignored(path) {
            return false;
        }
        let relative = self.relative_str(path);
        scopes.iter().any(|s| s.matches(path, &relative))
    }

    fn is_ignored(&self, path: &Path) -> bool {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .any(|c| {
                c.as_os_str()
                    .to_str()
                    .is_some_and(|s| IGNORED_DIRS.iter().any(|d| *d == s))
            })
    }

    /// Root-relative path with separators normalized to `/`.
    fn relative_str(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Reads a text file, tolerating whatever is on disk.
///
/// Strips a UTF-8 byte-order mark, decodes lossily, and normalizes newlines.
/// I/O failures are logged and yield an empty string so a single unreadable
/// file never aborts a scan.
pub fn read_text(path: &Path) -> String {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Skipping the file {}, {}", path.display(), e);
            return String::new();
        }
    };
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(&bytes);
    let text = String::from_utf8_lossy(bytes);
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.into_owned()
    }
}
