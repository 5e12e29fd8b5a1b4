//! Extension trait wiring content settings into mdbconfig

use mdbconfig::Config;
use serde_yaml::Value;
use std::time::Duration;

const DEFAULT_POSTS_DIR: &str = "posts";
const DEFAULT_MUSIC_DIR: &str = "public/music";
const DEFAULT_REFRESH_DELAY_SECS: u64 = 2;
const DEFAULT_REFRESH_MAX_ATTEMPTS: usize = 5;

/// Extension trait adding content-layer accessors to [`Config`]
pub trait ContentConfigExt {
    /// Directory holding the Markdown posts
    fn get_posts_dir(&self) -> String;

    /// Directory holding the uploaded music files
    fn get_music_dir(&self) -> String;

    /// Pause between listing re-fetches after a write
    ///
    /// The remote store's listings are eventually consistent; this is the
    /// bounded-staleness compensation window.
    fn get_refresh_delay(&self) -> Duration;

    /// Ceiling on listing re-fetch attempts
    fn get_refresh_max_attempts(&self) -> usize;
}

impl ContentConfigExt for Config {
    fn get_posts_dir(&self) -> String {
        self.get_string_or(&["content", "posts_dir"], DEFAULT_POSTS_DIR)
    }

    fn get_music_dir(&self) -> String {
        self.get_string_or(&["content", "music_dir"], DEFAULT_MUSIC_DIR)
    }

    fn get_refresh_delay(&self) -> Duration {
        let secs = match self.get_value(&["sync", "refresh_delay_secs"]) {
            Ok(Value::Number(n)) if n.is_u64() => n.as_u64().unwrap(),
            _ => DEFAULT_REFRESH_DELAY_SECS,
        };
        Duration::from_secs(secs)
    }

    fn get_refresh_max_attempts(&self) -> usize {
        match self.get_value(&["sync", "refresh_max_attempts"]) {
            Ok(Value::Number(n)) if n.is_u64() => n.as_u64().unwrap() as usize,
            _ => DEFAULT_REFRESH_MAX_ATTEMPTS,
        }
    }
}
