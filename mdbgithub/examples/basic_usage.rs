//! Minimal example: list the posts of the configured data repository.
//!
//! Usage:
//!   MDBLOG_CONFIG__REPO__OWNER=octocat \
//!   MDBLOG_CONFIG__REPO__NAME=blog-data \
//!   cargo run --example basic_usage

use mdbgithub::GithubClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = mdbconfig::get_config();
    let client = GithubClient::from_config(&config)?;

    match client.list_directory("posts").await {
        Ok(files) => {
            println!("{} entries in posts/", files.len());
            for file in files.iter().filter(|f| f.is_file()) {
                println!("  {} ({} bytes, sha {})", file.name, file.size, file.sha);
            }
        }
        Err(e) if e.is_not_found() => {
            println!("No posts directory yet.");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
