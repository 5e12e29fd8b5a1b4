//! # mdbgithub
//!
//! Typed client for using a GitHub repository as a datastore.
//!
//! MDBlog keeps its posts (Markdown files) and music (binary blobs) as
//! plain files in a repository and talks to the hosting provider's contents
//! API directly. This crate wraps that API into a small CRUD layer:
//!
//! - **Listing**: [`GithubClient::list_directory`]
//! - **Reads**: [`GithubClient::read_file`] (byte-safe base64 decode),
//!   [`GithubClient::read_file_raw`] for binary blobs
//! - **Writes**: [`GithubClient::write_file`], [`GithubClient::upload_binary`],
//!   [`GithubClient::delete_file`] — all guarded by the store's
//!   optimistic-concurrency sha tokens
//! - **Identity**: [`GithubClient::current_user`] for session resolution
//!
//! Errors keep their meaning across the boundary ([`GithubError`]): callers
//! can distinguish an absent directory from an expired credential from a
//! stale-write conflict, and react per case.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mdbgithub::GithubClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GithubClient::new("octocat", "blog-data", "main")?;
//!     client.set_token("ghp_...");
//!
//!     let posts = client.list_directory("posts").await?;
//!     for entry in posts {
//!         println!("{} ({})", entry.path, entry.sha);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config_ext;
pub mod encoding;
pub mod error;
pub mod models;

pub use client::GithubClient;
pub use config_ext::GithubConfigExt;
pub use error::{GithubError, Result};
pub use models::{FileContent, Identity, RepoFile, WriteOutcome};
