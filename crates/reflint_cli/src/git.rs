//! Staged-file discovery through the local git repository.
//!
//! Used by `--staged` to narrow a scan to what a commit is about to touch.
//! Anything that prevents discovery (no repository, unreadable index) is a
//! soft failure: the caller falls back to a full scan.

use std::path::{Path, PathBuf};

use git2::{Delta, Repository};
use tracing::debug;

/// Index entries added, copied or modified relative to HEAD, restricted to
/// the given extensions.
///
/// Returns `None` when there is no repository, the index cannot be diffed,
/// or nothing relevant is staged.
pub fn staged_files(root: &Path, extensions: &[&str]) -> Option<Vec<PathBuf>> {
    let repo = match Repository::discover(root) {
        Ok(repo) => repo,
        Err(e) => {
            debug!("No git repository at {}: {}", root.display(), e);
            return None;
        }
    };

    // An unborn HEAD diffs the index against an empty tree.
    let head_tree = repo.head().ok().and_then(|head| head.peel_to_tree().ok());
    let diff = match repo.diff_tree_to_index(head_tree.as_ref(), None, None) {
        Ok(diff) => diff,
        Err(e) => {
            debug!("Failed to diff index: {e}");
            return None;
        }
    };

    let workdir = repo.workdir()?.to_path_buf();
    let mut files = Vec::new();
    for delta in diff.deltas() {
        if !matches!(
            delta.status(),
            Delta::Added | Delta::Copied | Delta::Modified
        ) {
            continue;
        }
        let Some(path) = delta.new_file().path() else {
            continue;
        };
        let ext_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.iter().any(|x| *x == e));
        if ext_ok {
            files.push(workdir.join(path));
        }
    }

    if files.is_empty() { None } else { Some(files) }
}
