//! Post store: CRUD for Markdown posts over the repository client

use crate::config_ext::ContentConfigExt;
use crate::error::{ContentError, Result};
use crate::matter::{self, FrontMatter};
use crate::pending::Keyed;
use chrono::{Local, NaiveDate};
use mdbconfig::Config;
use mdbgithub::GithubClient;
use std::sync::Arc;
use tracing::{debug, warn};

/// A blog post, parsed from its stored Markdown file
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Identifier derived from the filename (`<slug>.md`)
    pub slug: String,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub description: String,
    pub tags: Vec<String>,
    /// Markdown body, without the front matter block
    pub body: String,
    /// Concurrency token from the last read; `None` for posts never stored
    pub sha: Option<String>,
}

impl Keyed for Post {
    fn key(&self) -> &str {
        &self.slug
    }
}

/// Derives a slug from a post title: trimmed, lowercased, whitespace runs
/// collapsed to single hyphens
///
/// This mapping is not injective; [`PostStore::save_post`] refuses collisions
/// rather than overwriting the earlier post.
pub fn derive_slug(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// High-level post operations layered over [`GithubClient`]
pub struct PostStore {
    client: Arc<GithubClient>,
    posts_dir: String,
}

impl PostStore {
    /// Creates a store using the default `posts` directory
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self {
            client,
            posts_dir: "posts".to_string(),
        }
    }

    /// Creates a store using the configured posts directory
    pub fn from_config(client: Arc<GithubClient>, config: &Config) -> Self {
        Self {
            posts_dir: config.get_posts_dir(),
            client,
        }
    }

    fn post_path(&self, slug: &str) -> String {
        format!("{}/{}.md", self.posts_dir, slug)
    }

    /// Lists all posts, newest first
    ///
    /// A posts directory that does not exist yet is an empty list. A single
    /// file that fails to fetch or parse is logged and skipped; it never
    /// fails the whole listing.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let entries = match self.client.list_directory(&self.posts_dir).await {
            Ok(entries) => entries,
            Err(e) if e.is_not_found() => {
                debug!("Posts directory does not exist yet, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut posts = Vec::new();
        for entry in entries
            .iter()
            .filter(|f| f.is_file() && f.name.ends_with(".md"))
        {
            let slug = entry.name.trim_end_matches(".md").to_string();
            match self.fetch_post(&slug, &entry.path).await {
                Ok(post) => posts.push(post),
                Err(e) => {
                    warn!(path = %entry.path, "Skipping unreadable post: {}", e);
                }
            }
        }

        // Newest first; posts without a date sort last
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    /// Fetches and parses one post by slug
    pub async fn get_post(&self, slug: &str) -> Result<Post> {
        let path = self.post_path(slug);
        self.fetch_post(slug, &path).await
    }

    async fn fetch_post(&self, slug: &str, path: &str) -> Result<Post> {
        let file = self.client.read_file(path).await?;
        let (matter, body) = matter::parse(&file.content)?;

        Ok(Post {
            slug: slug.to_string(),
            title: matter.title,
            date: matter.date,
            description: matter.description,
            tags: matter.tags,
            body,
            sha: Some(file.sha),
        })
    }

    /// Persists a post, creating or updating its file
    ///
    /// For a new post the slug is derived from the title; a title that
    /// derives to an empty slug is rejected, and an existing file at the
    /// derived path fails with a conflict before anything is written. Edits keep their slug and must carry the sha from the last
    /// read; a remote change since then surfaces as a conflict.
    ///
    /// The date is stamped only when the post has none, so edits preserve
    /// the original publish date.
    ///
    /// Returns the stored post, carrying the fresh concurrency token.
    pub async fn save_post(&self, post: &Post, is_new: bool) -> Result<Post> {
        let slug = if is_new {
            let slug = derive_slug(&post.title);
            if slug.is_empty() {
                return Err(ContentError::EmptySlug(post.title.clone()));
            }
            slug
        } else {
            post.slug.clone()
        };
        let path = self.post_path(&slug);

        if is_new {
            match self.client.read_file(&path).await {
                Ok(_) => return Err(ContentError::SlugConflict(slug)),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }

        let date = post.date.unwrap_or_else(|| Local::now().date_naive());
        let matter = FrontMatter {
            title: post.title.clone(),
            date: Some(date),
            description: post.description.clone(),
            tags: post.tags.clone(),
        };
        let raw = matter::serialize(&matter, &post.body)?;

        let (message, expected_sha) = if is_new {
            (format!("Create post: {}", post.title), None)
        } else {
            let sha = post
                .sha
                .as_deref()
                .ok_or_else(|| ContentError::MissingSha(slug.clone()))?;
            (format!("Update post: {}", post.title), Some(sha))
        };

        let outcome = self
            .client
            .write_file(&path, &raw, &message, expected_sha)
            .await?;

        debug!(slug = %slug, sha = %outcome.sha, "Post saved");

        Ok(Post {
            slug,
            date: Some(date),
            sha: Some(outcome.sha),
            title: post.title.clone(),
            description: post.description.clone(),
            tags: post.tags.clone(),
            body: post.body.clone(),
        })
    }

    /// Deletes a post, presenting its concurrency token
    pub async fn delete_post(&self, post: &Post) -> Result<()> {
        let sha = post
            .sha
            .as_deref()
            .ok_or_else(|| ContentError::MissingSha(post.slug.clone()))?;
        let path = self.post_path(&post.slug);
        let message = format!("Delete post: {}", post.slug);

        self.client.delete_file(&path, sha, &message).await?;
        Ok(())
    }
}
