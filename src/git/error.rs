//! Error types for repository access

use std::path::PathBuf;
use thiserror::Error;

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Errors that can occur while reading a bare repository
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository exists at the conventional path for the project
    #[error("Repository not found at path: {path}")]
    RepositoryNotFound { path: PathBuf },

    /// The default branch tip cannot be resolved (e.g. empty repository)
    #[error("Cannot resolve default branch tip: {message}")]
    TreeResolution { message: String },

    /// The path does not exist at the resolved tree tip
    #[error("File not found in repository: {path}")]
    FileNotFound { path: String },

    /// Git object store error
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// True when the error means "this file is absent", as opposed to an IO
    /// failure. Absent files are an expected outcome on the search path.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GitError::FileNotFound { .. })
    }
}
