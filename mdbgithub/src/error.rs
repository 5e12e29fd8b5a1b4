//! Error handling for the repository contents client

use thiserror::Error;

/// Crate-local Result type for mdbgithub
pub type Result<T> = std::result::Result<T, GithubError>;

/// Errors raised while talking to the repository contents API
#[derive(Error, Debug)]
pub enum GithubError {
    /// Missing, invalid or expired credential
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Path absent on the remote store
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Optimistic-concurrency failure: the presented sha no longer matches
    /// the remote blob, or a create targeted an existing path
    #[error("Write conflict: {0}")]
    Conflict(String),

    /// Provider throttling; the caller decides on backoff
    #[error("Rate limit exceeded, please try again later")]
    RateLimited,

    /// Transport-level error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed JSON payload
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Transport base64 or UTF-8 decode failure
    #[error("Content encoding error: {0}")]
    Encoding(String),

    /// Configuration error (anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Any other API error
    #[error("GitHub API error (code {code}): {message}")]
    ApiError { code: u16, message: String },
}

impl GithubError {
    /// Creates an error from an HTTP status code and response message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            401 => Self::Unauthorized(message),
            403 if message.to_lowercase().contains("rate limit") => Self::RateLimited,
            403 => Self::Unauthorized(message),
            404 => Self::NotFound(message),
            // 409 is the sha-mismatch answer; 422 is what a create against an
            // existing path gets back from the contents API.
            409 | 422 => Self::Conflict(message),
            429 => Self::RateLimited,
            _ => Self::ApiError { code, message },
        }
    }

    /// Checks whether the error means the credential is unusable (401/403)
    pub fn is_auth_error(&self) -> bool {
        matches!(self, GithubError::Unauthorized(_))
    }

    /// Checks whether the error is a rate-limiting error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, GithubError::RateLimited)
    }

    /// Checks whether the error means the path does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, GithubError::NotFound(_))
    }

    /// Checks whether the error is a stale-write conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, GithubError::Conflict(_))
    }
}
