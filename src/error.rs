//! Error types for tree discovery and summary generation

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Summary target is neither an existing file nor an existing directory.
    #[error("path {0} should be an existing file or directory")]
    InvalidTarget(PathBuf),

    #[error("summary store root must be a directory path")]
    EmptyStoreRoot,

    /// Path handed to the tree builder is empty, absolute, or escapes the root.
    #[error("invalid relative path: {0:?}")]
    InvalidPath(PathBuf),

    #[error("cannot discover files: {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to run git: {0}")]
    GitSpawn(#[source] std::io::Error),

    #[error("filesystem walk failed: {0}")]
    Walk(#[from] ignore::Error),

    #[error("git ls-files exited with {status}: {stderr}")]
    GitFailed { status: ExitStatus, stderr: String },

    /// Two discovered paths disagree on whether a node is a file or a directory.
    #[error("conflicting file and directory at {path}")]
    TreeConflict { path: PathBuf },

    #[error("backend error: {0}")]
    Backend(String),

    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no stored summary for {} (directory: {is_directory})", .path.display())]
    SummaryNotFound { path: PathBuf, is_directory: bool },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
