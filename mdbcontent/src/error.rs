//! Error handling for the content adapters

use mdbgithub::GithubError;
use thiserror::Error;

/// Crate-local Result type for mdbcontent
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors raised by the post and music stores
#[derive(Error, Debug)]
pub enum ContentError {
    /// Error from the underlying repository client, propagated untouched
    #[error("Repository error: {0}")]
    Github(#[from] GithubError),

    /// Malformed front matter in a post file
    #[error("Front matter error: {0}")]
    FrontMatter(String),

    /// A new post would land on an already-taken slug
    #[error("A post with slug '{0}' already exists")]
    SlugConflict(String),

    /// A title that derives to an empty slug cannot name a file
    #[error("Title '{0}' does not derive a usable slug")]
    EmptySlug(String),

    /// Update or delete without a previously observed concurrency token
    #[error("No concurrency token for '{0}': load it from the store first")]
    MissingSha(String),

    /// Configuration error (anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl ContentError {
    /// Checks whether the error means the target does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::Github(e) if e.is_not_found())
    }

    /// Checks whether the error is a write conflict, either the store's
    /// stale-sha rejection or the local slug-collision refusal
    pub fn is_conflict(&self) -> bool {
        match self {
            ContentError::SlugConflict(_) => true,
            ContentError::Github(e) => e.is_conflict(),
            _ => false,
        }
    }
}
