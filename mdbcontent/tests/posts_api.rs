//! Integration tests for the post store, against a local mock server.

use chrono::NaiveDate;
use mdbcontent::{ContentError, Post, PostStore};
use mdbgithub::{encoding, GithubClient};
use mockito::Matcher;
use std::sync::Arc;

fn store_for(server: &mockito::ServerGuard) -> PostStore {
    let client = GithubClient::new("octocat", "blog-data", "main")
        .unwrap()
        .with_base_url(server.url());
    PostStore::new(Arc::new(client))
}

fn post_body(title: &str, date: &str, body: &str) -> String {
    format!(
        "---\ntitle: {}\ndate: {}\ndescription: ''\ntags: []\n---\n{}",
        title, date, body
    )
}

fn file_json(path: &str, sha: &str, text: &str) -> String {
    serde_json::json!({
        "name": path.rsplit('/').next().unwrap(),
        "path": path,
        "sha": sha,
        "type": "file",
        "content": encoding::encode(text.as_bytes()),
        "encoding": "base64",
    })
    .to_string()
}

#[tokio::test]
async fn list_posts_sorts_newest_first_and_skips_unreadable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/blog-data/contents/posts")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"[
                {"name": "old.md", "path": "posts/old.md", "sha": "s1", "type": "file"},
                {"name": "new.md", "path": "posts/new.md", "sha": "s2", "type": "file"},
                {"name": "broken.md", "path": "posts/broken.md", "sha": "s3", "type": "file"},
                {"name": "cover.png", "path": "posts/cover.png", "sha": "s4", "type": "file"}
            ]"#,
        )
        .create_async()
        .await;
    server
        .mock("GET", "/repos/octocat/blog-data/contents/posts/old.md")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(file_json(
            "posts/old.md",
            "s1",
            &post_body("Old", "2024-01-01", "first\n"),
        ))
        .create_async()
        .await;
    server
        .mock("GET", "/repos/octocat/blog-data/contents/posts/new.md")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(file_json(
            "posts/new.md",
            "s2",
            &post_body("New", "2024-06-01", "second\n"),
        ))
        .create_async()
        .await;
    // One post fails to fetch; the listing must survive without it
    server
        .mock("GET", "/repos/octocat/blog-data/contents/posts/broken.md")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;

    let posts = store_for(&server).list_posts().await.unwrap();
    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["new", "old"]);
    assert_eq!(posts[0].title, "New");
    assert_eq!(posts[0].sha.as_deref(), Some("s2"));
}

#[tokio::test]
async fn list_posts_missing_directory_is_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/blog-data/contents/posts")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;

    let posts = store_for(&server).list_posts().await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn save_new_post_refuses_slug_collision() {
    let mut server = mockito::Server::new_async().await;
    // The derived path already exists: the probe finds a file
    let probe = server
        .mock("GET", "/repos/octocat/blog-data/contents/posts/hello-world.md")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(file_json(
            "posts/hello-world.md",
            "s1",
            &post_body("Hello World", "2024-01-01", "earlier\n"),
        ))
        .create_async()
        .await;

    let post = Post {
        slug: String::new(),
        title: "Hello   WORLD".to_string(),
        date: None,
        description: String::new(),
        tags: vec![],
        body: "later\n".to_string(),
        sha: None,
    };

    let err = store_for(&server).save_post(&post, true).await.unwrap_err();
    assert!(matches!(err, ContentError::SlugConflict(ref s) if s == "hello-world"));
    probe.assert_async().await;
}

#[tokio::test]
async fn save_new_post_creates_file_without_sha() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/blog-data/contents/posts/fresh-take.md")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/repos/octocat/blog-data/contents/posts/fresh-take.md")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "message": "Create post: Fresh Take",
            "branch": "main",
        })))
        .with_status(201)
        .with_body(r#"{"content": {"sha": "new-sha", "download_url": null}}"#)
        .create_async()
        .await;

    let post = Post {
        slug: String::new(),
        title: "Fresh Take".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 5, 5),
        description: "notes".to_string(),
        tags: vec!["rust".to_string()],
        body: "content\n".to_string(),
        sha: None,
    };

    let saved = store_for(&server).save_post(&post, true).await.unwrap();
    assert_eq!(saved.slug, "fresh-take");
    assert_eq!(saved.sha.as_deref(), Some("new-sha"));
    assert_eq!(saved.date, post.date);
    put.assert_async().await;
}

#[tokio::test]
async fn save_edit_preserves_original_date() {
    let mut server = mockito::Server::new_async().await;
    let original_date = NaiveDate::from_ymd_opt(2023, 11, 20).unwrap();
    // The edited body must serialize with the original date, byte for byte
    let expected_raw = post_body("Kept Date", "2023-11-20", "edited body\n");
    let put = server
        .mock("PUT", "/repos/octocat/blog-data/contents/posts/kept-date.md")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "message": "Update post: Kept Date",
            "content": encoding::encode(expected_raw.as_bytes()),
            "sha": "old-sha",
            "branch": "main",
        })))
        .with_status(200)
        .with_body(r#"{"content": {"sha": "next-sha", "download_url": null}}"#)
        .create_async()
        .await;

    let post = Post {
        slug: "kept-date".to_string(),
        title: "Kept Date".to_string(),
        date: Some(original_date),
        description: String::new(),
        tags: vec![],
        body: "edited body\n".to_string(),
        sha: Some("old-sha".to_string()),
    };

    let saved = store_for(&server).save_post(&post, false).await.unwrap();
    assert_eq!(saved.date, Some(original_date));
    assert_eq!(saved.sha.as_deref(), Some("next-sha"));
    put.assert_async().await;
}

#[tokio::test]
async fn save_edit_with_stale_sha_is_conflict() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", "/repos/octocat/blog-data/contents/posts/raced.md")
        .match_body(Matcher::Any)
        .with_status(409)
        .with_body(r#"{"message": "posts/raced.md does not match"}"#)
        .create_async()
        .await;

    let post = Post {
        slug: "raced".to_string(),
        title: "Raced".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 1),
        description: String::new(),
        tags: vec![],
        body: "body\n".to_string(),
        sha: Some("stale".to_string()),
    };

    let err = store_for(&server)
        .save_post(&post, false)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn save_edit_without_sha_is_rejected_locally() {
    let server = mockito::Server::new_async().await;

    let post = Post {
        slug: "no-token".to_string(),
        title: "No Token".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 1),
        description: String::new(),
        tags: vec![],
        body: "body\n".to_string(),
        sha: None,
    };

    // No mock registered: the call must fail before any request is made
    let err = store_for(&server)
        .save_post(&post, false)
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::MissingSha(_)));
}

#[tokio::test]
async fn save_new_post_with_blank_title_is_rejected_locally() {
    let server = mockito::Server::new_async().await;

    let post = Post {
        slug: String::new(),
        title: "   ".to_string(),
        date: None,
        description: String::new(),
        tags: vec![],
        body: "body\n".to_string(),
        sha: None,
    };

    // No mock registered: the empty derived slug must be refused before
    // any request is made
    let err = store_for(&server).save_post(&post, true).await.unwrap_err();
    assert!(matches!(err, ContentError::EmptySlug(_)));
}

#[tokio::test]
async fn delete_post_presents_sha() {
    let mut server = mockito::Server::new_async().await;
    let del = server
        .mock("DELETE", "/repos/octocat/blog-data/contents/posts/goner.md")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "message": "Delete post: goner",
            "sha": "s9",
            "branch": "main",
        })))
        .with_status(200)
        .with_body(r#"{"content": null}"#)
        .create_async()
        .await;

    let post = Post {
        slug: "goner".to_string(),
        title: "Goner".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 1),
        description: String::new(),
        tags: vec![],
        body: String::new(),
        sha: Some("s9".to_string()),
    };

    store_for(&server).delete_post(&post).await.unwrap();
    del.assert_async().await;
}
