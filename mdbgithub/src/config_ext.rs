//! Extension trait wiring repository settings into mdbconfig
//!
//! The stored credential is the single piece of durable client state: one
//! key, written on login, removed on logout. It lives in the config file
//! encrypted with the machine-bound key from [`mdbconfig::encryption`].

use anyhow::{anyhow, Result};
use mdbconfig::encryption;
use mdbconfig::Config;
use serde_yaml::Value;

/// Extension trait adding repository and credential accessors to [`Config`]
///
/// # Example
///
/// ```rust,ignore
/// use mdbconfig::get_config;
/// use mdbgithub::GithubConfigExt;
///
/// let config = get_config();
/// let owner = config.get_repo_owner()?;
/// println!("Data repository owner: {}", owner);
/// ```
pub trait GithubConfigExt {
    /// Returns the owner login of the data repository
    ///
    /// # Errors
    ///
    /// Fails if no owner is configured
    fn get_repo_owner(&self) -> Result<String>;

    /// Returns the name of the data repository
    ///
    /// # Errors
    ///
    /// Fails if no repository name is configured
    fn get_repo_name(&self) -> Result<String>;

    /// Returns the branch holding the content, defaulting to `main`
    fn get_repo_branch(&self) -> String;

    /// Returns the API entry point, defaulting to the public endpoint
    fn get_api_base_url(&self) -> String;

    /// Returns the stored credential, decrypted, or `None` when absent
    fn get_api_token(&self) -> Result<Option<String>>;

    /// Stores the credential, encrypted at rest
    fn set_api_token(&self, token: &str) -> Result<()>;

    /// Removes the stored credential
    fn clear_api_token(&self) -> Result<()>;
}

impl GithubConfigExt for Config {
    fn get_repo_owner(&self) -> Result<String> {
        match self.get_value(&["repo", "owner"]) {
            Ok(Value::String(s)) if !s.is_empty() => Ok(s),
            _ => Err(anyhow!("No repository owner configured (repo.owner)")),
        }
    }

    fn get_repo_name(&self) -> Result<String> {
        match self.get_value(&["repo", "name"]) {
            Ok(Value::String(s)) if !s.is_empty() => Ok(s),
            _ => Err(anyhow!("No repository name configured (repo.name)")),
        }
    }

    fn get_repo_branch(&self) -> String {
        self.get_string_or(&["repo", "branch"], "main")
    }

    fn get_api_base_url(&self) -> String {
        self.get_string_or(&["repo", "api_base_url"], "https://api.github.com")
    }

    fn get_api_token(&self) -> Result<Option<String>> {
        match self.get_value(&["auth", "token"]) {
            Ok(Value::String(s)) if !s.is_empty() => Ok(Some(encryption::get_token(&s)?)),
            _ => Ok(None),
        }
    }

    fn set_api_token(&self, token: &str) -> Result<()> {
        let encrypted = encryption::encrypt_token(token)?;
        self.set_value(&["auth", "token"], Value::String(encrypted))
    }

    fn clear_api_token(&self) -> Result<()> {
        self.set_value(&["auth", "token"], Value::String(String::new()))
    }
}
