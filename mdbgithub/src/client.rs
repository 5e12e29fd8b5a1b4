//! Typed client for the repository contents API
//!
//! This module turns the path-addressed file API of the hosting provider
//! into a small CRUD data layer: list, read, create/update, delete, binary
//! upload, plus the identity lookup used for session resolution.
//!
//! The client performs no retries itself. Failures, including rate limiting
//! and stale-write conflicts, propagate untouched so the caller can decide.
//! One documented property matters to every caller: directory listings are
//! eventually consistent after a write, so a listing issued right after a
//! commit may still reflect the pre-write state.

use crate::config_ext::GithubConfigExt;
use crate::encoding;
use crate::error::{GithubError, Result};
use crate::models::*;
use mdbconfig::Config;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, warn};

/// Default API entry point, overridable through the config or [`GithubClient::with_base_url`]
const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Client for one data repository on the hosting provider
pub struct GithubClient {
    /// HTTP client
    client: Client,
    /// API entry point
    base_url: String,
    /// Repository owner (also the login with editing rights)
    owner: String,
    /// Repository name
    repo: String,
    /// Branch holding the content
    branch: String,
    /// Bearer credential; anonymous requests are allowed for public repos.
    /// Interior-mutable so one shared client can be injected everywhere
    /// while the session store alone rotates the credential.
    token: RwLock<Option<String>>,
}

impl GithubClient {
    /// Creates a client for the given repository
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("mdblog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            token: RwLock::new(None),
        })
    }

    /// Creates a client from a [`mdbconfig::Config`] object
    ///
    /// Reads the repository coordinates, the API base URL and the stored
    /// credential (decrypted transparently) from the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let owner = config.get_repo_owner()?;
        let repo = config.get_repo_name()?;
        let mut client = Self::new(owner, repo, config.get_repo_branch())?;
        client.base_url = config.get_api_base_url();
        if let Some(token) = config.get_api_token()? {
            client.set_token(token);
        }
        Ok(client)
    }

    /// Overrides the API entry point (test servers, GitHub Enterprise hosts)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the bearer credential used on every subsequent request
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap() = Some(token.into());
    }

    /// Clears the bearer credential
    pub fn clear_token(&self) {
        *self.token.write().unwrap() = None;
    }

    /// Checks whether a credential is attached
    pub fn has_token(&self) -> bool {
        self.token.read().unwrap().is_some()
    }

    /// Returns the configured repository owner login
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the configured branch
    pub fn branch(&self) -> &str {
        &self.branch
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            self.owner,
            self.repo,
            path.trim_start_matches('/')
        )
    }

    /// Attaches auth headers and sends the request
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let mut request = request.header("Accept", "application/vnd.github+json");
        let token = self.token.read().unwrap().clone();
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// Maps the HTTP response into a typed result
    ///
    /// Error bodies carry a `{"message": ...}` envelope which is folded into
    /// the error; the status code drives the taxonomy mapping.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let status_code = status.as_u16();

        debug!("Response status: {}", status);

        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str().map(String::from)))
                .unwrap_or(text);
            warn!("API error ({}): {}", status_code, message);
            return Err(GithubError::from_status_code(status_code, message));
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse response: {}", e);
            GithubError::JsonParse(e)
        })
    }

    // ============ Directory listing ============

    /// Lists the entries of a directory
    ///
    /// Callers listing a directory that may not exist yet must treat
    /// [`GithubError::NotFound`] as "empty", not as fatal.
    pub async fn list_directory(&self, path: &str) -> Result<Vec<RepoFile>> {
        let url = self.contents_url(path);
        debug!("GET {} (ref={})", url, self.branch);

        let request = self.client.get(&url).query(&[("ref", &self.branch)]);
        let response = self.send(request).await?;

        // A file path answers with a single object instead of an array
        let value: Value = self.handle_response(response).await?;
        let files = match value {
            Value::Array(_) => serde_json::from_value(value)?,
            other => vec![serde_json::from_value(other)?],
        };
        Ok(files)
    }

    // ============ File content ============

    /// Reads a file and decodes its transport-encoded body into text
    pub async fn read_file(&self, path: &str) -> Result<FileContent> {
        let payload = self.fetch_payload(path).await?;
        let encoded = Self::require_content(&payload)?;
        let content = encoding::decode_utf8(encoded)?;

        Ok(FileContent {
            path: payload.path,
            sha: payload.sha,
            content,
        })
    }

    /// Reads a file as raw bytes, skipping the UTF-8 step entirely
    pub async fn read_file_raw(&self, path: &str) -> Result<(Vec<u8>, String)> {
        let payload = self.fetch_payload(path).await?;
        let encoded = Self::require_content(&payload)?;
        let bytes = encoding::decode(encoded)?;
        Ok((bytes, payload.sha))
    }

    async fn fetch_payload(&self, path: &str) -> Result<FilePayload> {
        let url = self.contents_url(path);
        debug!("GET {} (ref={})", url, self.branch);

        let request = self.client.get(&url).query(&[("ref", &self.branch)]);
        let response = self.send(request).await?;
        self.handle_response(response).await
    }

    fn require_content(payload: &FilePayload) -> Result<&str> {
        match payload.encoding.as_deref() {
            Some("base64") | None => {}
            Some(other) => {
                return Err(GithubError::Encoding(format!(
                    "unexpected transport encoding '{}' for {}",
                    other, payload.path
                )));
            }
        }
        payload.content.as_deref().ok_or_else(|| {
            GithubError::Encoding(format!("no content returned for {}", payload.path))
        })
    }

    // ============ Writes ============

    /// Creates or updates a text file, producing one remote revision
    ///
    /// With `expected_sha` present this is an update: a mismatch with the
    /// remote blob fails with [`GithubError::Conflict`] and nothing is
    /// written. Without it this is a create, which the store rejects if the
    /// path already exists.
    pub async fn write_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        expected_sha: Option<&str>,
    ) -> Result<WriteOutcome> {
        self.put_contents(path, content.as_bytes(), message, expected_sha)
            .await
    }

    /// Uploads a binary blob; the body never goes through a text decode path
    pub async fn upload_binary(
        &self,
        path: &str,
        bytes: &[u8],
        message: &str,
    ) -> Result<WriteOutcome> {
        self.put_contents(path, bytes, message, None).await
    }

    async fn put_contents(
        &self,
        path: &str,
        bytes: &[u8],
        message: &str,
        expected_sha: Option<&str>,
    ) -> Result<WriteOutcome> {
        let url = self.contents_url(path);
        debug!("PUT {} ({} bytes)", url, bytes.len());

        let mut body = json!({
            "message": message,
            "content": encoding::encode(bytes),
            "branch": self.branch,
        });
        if let Some(sha) = expected_sha {
            body["sha"] = json!(sha);
        }

        let request = self.client.put(&url).json(&body);
        let response = self.send(request).await?;
        let commit: CommitResponse = self.handle_response(response).await?;

        let content = commit.content.ok_or_else(|| GithubError::ApiError {
            code: 0,
            message: format!("write response for {} carried no content", path),
        })?;

        Ok(WriteOutcome {
            sha: content.sha,
            download_url: content.download_url,
        })
    }

    /// Deletes a file, presenting the last observed sha
    pub async fn delete_file(&self, path: &str, sha: &str, message: &str) -> Result<()> {
        let url = self.contents_url(path);
        debug!("DELETE {}", url);

        let body = json!({
            "message": message,
            "sha": sha,
            "branch": self.branch,
        });

        let request = self.client.delete(&url).json(&body);
        let response = self.send(request).await?;
        let _: CommitResponse = self.handle_response(response).await?;
        Ok(())
    }

    // ============ Identity ============

    /// Resolves the authenticated user from the attached credential
    pub async fn current_user(&self) -> Result<Identity> {
        if !self.has_token() {
            return Err(GithubError::Unauthorized("no credential attached".into()));
        }

        let url = format!("{}/user", self.base_url);
        debug!("GET {}", url);

        let request = self.client.get(&url);
        let response = self.send(request).await?;
        self.handle_response(response).await
    }
}
