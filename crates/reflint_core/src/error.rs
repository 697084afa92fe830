//! Validator error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a validation run.
///
/// Per-file read and decode failures are deliberately not represented here:
/// they are logged and the file is treated as empty.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The scan root does not exist.
    #[error("Path does not exist: {0}")]
    RootMissing(PathBuf),

    /// The scan root is not a directory.
    #[error("Path is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    /// An extraction pattern failed to compile.
    #[error("Invalid extraction pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
