//! Music store: listing, upload and delete of audio assets

use crate::config_ext::ContentConfigExt;
use crate::error::{ContentError, Result};
use crate::pending::Keyed;
use mdbconfig::Config;
use mdbgithub::{GithubClient, RepoFile};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Audio file extensions the player understands
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "ogg", "wav", "flac", "m4a"];

/// An audio asset stored in the music directory
///
/// Identity for "is this the current track" comparisons is the full `path`,
/// not the filename: two files with the same basename must not collide.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub download_url: Option<String>,
}

impl Keyed for Track {
    fn key(&self) -> &str {
        &self.path
    }
}

impl From<&RepoFile> for Track {
    fn from(file: &RepoFile) -> Self {
        Self {
            name: file.name.clone(),
            path: file.path.clone(),
            sha: file.sha.clone(),
            download_url: file.download_url.clone(),
        }
    }
}

fn is_audio_file(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// High-level music operations layered over [`GithubClient`]
pub struct MusicStore {
    client: Arc<GithubClient>,
    music_dir: String,
    refresh_delay: Duration,
    refresh_max_attempts: usize,
}

impl MusicStore {
    /// Creates a store with the default directory and refresh policy
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self {
            client,
            music_dir: "public/music".to_string(),
            refresh_delay: Duration::from_secs(2),
            refresh_max_attempts: 5,
        }
    }

    /// Creates a store using the configured directory and refresh policy
    pub fn from_config(client: Arc<GithubClient>, config: &Config) -> Self {
        Self {
            music_dir: config.get_music_dir(),
            refresh_delay: config.get_refresh_delay(),
            refresh_max_attempts: config.get_refresh_max_attempts(),
            client,
        }
    }

    /// Overrides the refresh policy (tests set a near-zero delay)
    pub fn with_refresh(mut self, delay: Duration, max_attempts: usize) -> Self {
        self.refresh_delay = delay;
        self.refresh_max_attempts = max_attempts.max(1);
        self
    }

    /// Lists the audio files of the music directory
    ///
    /// A directory that does not exist yet is an empty list, not an error.
    pub async fn list_tracks(&self) -> Result<Vec<Track>> {
        let entries = match self.client.list_directory(&self.music_dir).await {
            Ok(entries) => entries,
            Err(e) if e.is_not_found() => {
                debug!("Music directory does not exist yet, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(entries
            .iter()
            .filter(|f| f.is_file() && is_audio_file(&f.name))
            .map(Track::from)
            .collect())
    }

    /// Uploads an audio file into the music directory
    ///
    /// The bytes go through the binary path only; no text decode step ever
    /// touches them. The returned track carries the public download URL.
    ///
    /// A listing issued right after this call may not show the new file yet;
    /// use [`MusicStore::wait_for_listing`] to observe it.
    pub async fn upload_track(&self, bytes: &[u8], filename: &str) -> Result<Track> {
        let path = format!("{}/{}", self.music_dir, filename);
        let message = format!("Upload music {}", filename);

        let outcome = self.client.upload_binary(&path, bytes, &message).await?;
        debug!(path = %path, sha = %outcome.sha, "Track uploaded");

        Ok(Track {
            name: filename.to_string(),
            path,
            sha: outcome.sha,
            download_url: outcome.download_url,
        })
    }

    /// Deletes a track, presenting its concurrency token
    pub async fn delete_track(&self, track: &Track) -> Result<()> {
        let message = format!("Delete music: {}", track.name);
        self.client
            .delete_file(&track.path, &track.sha, &message)
            .await?;
        Ok(())
    }

    /// Re-lists until `predicate` holds or the attempt ceiling is reached
    ///
    /// This is the compensation for the store's list-after-write staleness
    /// window: a bounded retry loop instead of a fire-and-forget fixed
    /// delay. Returns the last listing either way; when the ceiling is hit
    /// without the predicate holding, that listing is simply the freshest
    /// state observed.
    pub async fn wait_for_listing<F>(&self, predicate: F) -> Result<Vec<Track>>
    where
        F: Fn(&[Track]) -> bool,
    {
        let mut tracks = Vec::new();
        for attempt in 1..=self.refresh_max_attempts {
            tracks = self.list_tracks().await?;
            if predicate(&tracks) {
                debug!(attempt, "Listing converged");
                return Ok(tracks);
            }
            if attempt < self.refresh_max_attempts {
                debug!(attempt, "Listing not converged yet, waiting");
                sleep(self.refresh_delay).await;
            }
        }
        warn!(
            attempts = self.refresh_max_attempts,
            "Listing did not converge within the attempt ceiling"
        );
        Ok(tracks)
    }
}

impl std::fmt::Debug for MusicStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicStore")
            .field("music_dir", &self.music_dir)
            .field("refresh_delay", &self.refresh_delay)
            .field("refresh_max_attempts", &self.refresh_max_attempts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file("song.mp3"));
        assert!(is_audio_file("SONG.MP3"));
        assert!(is_audio_file("take.flac"));
        assert!(!is_audio_file("cover.png"));
        assert!(!is_audio_file("README"));
        assert!(!is_audio_file(".gitkeep"));
    }
}
