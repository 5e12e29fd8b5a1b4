//! Content adapters over the repository client
//!
//! Two stores map repository files to domain objects:
//!
//! - [`PostStore`]: Markdown documents with a YAML front matter block,
//!   identified by a slug derived from their title.
//! - [`MusicStore`]: opaque audio files, identified by their full path.
//!
//! Both stores treat a missing content directory as an empty collection and
//! converge eventually-consistent listings with a bounded retry loop
//! ([`MusicStore::wait_for_listing`]) rather than a fixed delay. Optimistic
//! removals go through [`TrackedList`], which keeps each item in an explicit
//! lifecycle state so failed deletes can be reverted.

pub mod config_ext;
pub mod error;
pub mod matter;
pub mod music;
pub mod pending;
pub mod post;

pub use config_ext::ContentConfigExt;
pub use error::{ContentError, Result};
pub use matter::FrontMatter;
pub use music::{MusicStore, Track};
pub use pending::{EntryState, Keyed, TrackedList};
pub use post::{derive_slug, Post, PostStore};
