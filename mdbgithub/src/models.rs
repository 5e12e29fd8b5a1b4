//! Payload types exchanged with the contents API

use serde::{Deserialize, Serialize};

/// A directory listing entry
///
/// `sha` is the optimistic-concurrency token: updates and deletes must
/// present the last observed value, otherwise the store rejects the write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepoFile {
    pub name: String,
    pub path: String,
    pub sha: String,
    /// Entry kind reported by the API: "file", "dir", "symlink", "submodule"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl RepoFile {
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

/// A decoded text blob
///
/// `content` holds the exact decoded bytes of the remote blob as UTF-8 text;
/// re-encoding reproduces the original bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct FileContent {
    pub path: String,
    pub sha: String,
    pub content: String,
}

/// Raw file payload as returned by `GET /contents/<path>` for a single file
#[derive(Debug, Deserialize)]
pub(crate) struct FilePayload {
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Result of a successful create/update/upload
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    /// Sha of the written blob, to be presented on the next write
    pub sha: String,
    /// Public raw URL of the written blob, when the API reports one
    pub download_url: Option<String>,
}

/// Response envelope of `PUT`/`DELETE /contents/<path>`
#[derive(Debug, Deserialize)]
pub(crate) struct CommitResponse {
    #[serde(default)]
    pub content: Option<WrittenContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WrittenContent {
    pub sha: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// The authenticated user, resolved from the bearer credential
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}
