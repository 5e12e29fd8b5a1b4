//! Configuration layer for MDBlog.
//!
//! A single YAML document drives the whole application: embedded defaults
//! are merged with an external `config.yaml`, then environment variables
//! (`MDBLOG_CONFIG__SECTION__KEY`) override individual entries. All keys are
//! normalized to lowercase so lookups are case-insensitive. The merged
//! document is written back on load and on every `set`, so the on-disk file
//! always shows the full effective configuration.
//!
//! ```no_run
//! use mdbconfig::get_config;
//!
//! let config = get_config();
//! let branch = config.get_string_or(&["repo", "branch"], "main");
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::info;

pub mod encryption;

/// Defaults compiled into the binary; the external file only needs to list
/// what it changes
const DEFAULT_CONFIG: &str = include_str!("mdblog.yaml");

/// Environment variable naming the config directory
const ENV_CONFIG_DIR: &str = "MDBLOG_CONFIG";
/// Prefix for per-entry environment overrides, `__` separating path segments
const ENV_PREFIX: &str = "MDBLOG_CONFIG__";

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load MDBlog configuration"));
}

/// Global configuration singleton, loaded lazily on first access
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// The merged configuration document and its backing file
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

impl Clone for Config {
    fn clone(&self) -> Self {
        let data = self.data.lock().unwrap().clone();
        Self {
            config_dir: self.config_dir.clone(),
            path: self.path.clone(),
            data: Mutex::new(data),
        }
    }
}

impl Config {
    /// Loads the configuration rooted at `directory`
    ///
    /// An empty `directory` triggers the standard search: the
    /// `MDBLOG_CONFIG` environment variable, then `.mdblog` in the working
    /// directory, then `.mdblog` under the home directory. The directory is
    /// created when absent. After merging defaults, file and environment
    /// overrides, the effective document is written back to `config.yaml`.
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = resolve_config_dir(directory)?;
        info!(config_dir = %config_dir.display(), "Using config directory");

        let file = config_dir.join("config.yaml");
        let mut merged: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        match fs::read(&file) {
            Ok(bytes) => {
                info!(config_file = %file.display(), "Loaded config file");
                let external: Value = serde_yaml::from_slice(&bytes)?;
                merge_yaml(&mut merged, &external);
            }
            Err(_) => {
                info!(config_file = %file.display(), "No config file yet, using embedded defaults");
            }
        }

        let mut merged = lower_keys(merged);
        apply_env_overrides(&mut merged);

        let config = Config {
            config_dir: config_dir.to_string_lossy().to_string(),
            path: file.to_string_lossy().to_string(),
            data: Mutex::new(merged),
        };
        config.save()?;
        Ok(config)
    }

    /// Directory the configuration lives in
    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Writes the current document back to `config.yaml`
    pub fn save(&self) -> Result<()> {
        let yaml = {
            let data = self.data.lock().unwrap();
            serde_yaml::to_string(&*data)?
        };
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Reads the value at a key path, e.g. `&["repo", "owner"]`
    ///
    /// Fails when the path does not exist or crosses a non-mapping node.
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.data.lock().unwrap();
        get_at_path(&data, path)
    }

    /// Writes the value at a key path and persists the document
    ///
    /// Intermediate mappings are created as needed; keys are lowercased.
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        {
            let mut data = self.data.lock().unwrap();
            set_at_path(&mut data, path, value)?;
        }
        self.save()
    }

    /// Reads a non-empty string at the path, or the given default
    pub fn get_string_or(&self, path: &[&str], default: &str) -> String {
        match self.get_value(path) {
            Ok(Value::String(s)) if !s.is_empty() => s,
            _ => default.to_string(),
        }
    }

}

/// Picks and prepares the configuration directory
fn resolve_config_dir(directory: &str) -> Result<PathBuf> {
    let dir = if !directory.is_empty() {
        PathBuf::from(directory)
    } else if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
        info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Config directory from environment");
        PathBuf::from(env_path)
    } else if Path::new(".mdblog").exists() {
        PathBuf::from(".mdblog")
    } else if let Some(home) = home_dir() {
        home.join(".mdblog")
    } else {
        PathBuf::from(".mdblog")
    };

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    if !dir.is_dir() {
        return Err(anyhow!(
            "Configuration path {} is not a directory",
            dir.display()
        ));
    }
    Ok(dir)
}

fn get_at_path(data: &Value, path: &[&str]) -> Result<Value> {
    let mut node = data;
    for (i, key) in path.iter().enumerate() {
        let map = match node {
            Value::Mapping(map) => map,
            _ => return Err(anyhow!("Path {} is not a mapping", path[..i].join("."))),
        };
        node = map
            .get(&Value::String(key.to_lowercase()))
            .ok_or_else(|| anyhow!("Path {} does not exist", path[..=i].join(".")))?;
    }
    Ok(node.clone())
}

fn set_at_path(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        *data = value;
        return Ok(());
    };

    let mut node = data;
    for key in parents {
        let map = match node {
            Value::Mapping(map) => map,
            _ => return Err(anyhow!("Cannot descend into a non-mapping node")),
        };
        node = map
            .entry(Value::String(key.to_lowercase()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }
    match node {
        Value::Mapping(map) => {
            map.insert(Value::String(last.to_lowercase()), value);
            Ok(())
        }
        _ => Err(anyhow!("Cannot set a key on a non-mapping node")),
    }
}

/// Folds `MDBLOG_CONFIG__A__B=value` variables into the document
fn apply_env_overrides(config: &mut Value) {
    for (key, raw) in env::vars() {
        let Some(suffix) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let segments: Vec<&str> = suffix.split("__").collect();
        // Values parse as YAML scalars so numbers and booleans keep their type
        let value =
            serde_yaml::from_str::<Value>(&raw).unwrap_or_else(|_| Value::String(raw.clone()));
        let _ = set_at_path(config, &segments, value);
    }
}

/// Lowercases every mapping key, recursively
fn lower_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| {
                    let k = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (k, lower_keys(v))
                })
                .collect(),
        ),
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(lower_keys).collect()),
        other => other,
    }
}

/// Merges `external` over `default`: mappings merge per key, everything
/// else is replaced wholesale
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}
