//! Session store and its state machine

use crate::Result;
use mdbconfig::Config;
use mdbgithub::{GithubClient, GithubConfigExt, Identity};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle state of the client session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No usable credential
    Unauthenticated,
    /// A credential exists and identity resolution is in flight
    Resolving,
    /// Identity resolved; the session carries the provider identity
    Authenticated(Identity),
}

/// Holds the credential and the resolved identity for one client instance
///
/// At most one live credential per store. The store writes the credential
/// into durable storage (encrypted, via `mdbconfig`) and into the shared
/// [`GithubClient`]; every other component only ever reads it through the
/// client it was handed.
pub struct SessionStore {
    client: Arc<GithubClient>,
    config: Arc<Config>,
    state: SessionState,
    is_owner: bool,
}

impl SessionStore {
    /// Creates a store around the shared client and configuration
    ///
    /// The store starts `Unauthenticated`; call [`SessionStore::init`] to
    /// pick up a persisted credential.
    pub fn new(client: Arc<GithubClient>, config: Arc<Config>) -> Self {
        Self {
            client,
            config,
            state: SessionState::Unauthenticated,
            is_owner: false,
        }
    }

    /// Bootstraps the session from durable storage
    ///
    /// With a persisted credential the store transitions to `Resolving` and
    /// resolves the identity; without one it stays `Unauthenticated`.
    pub async fn init(&mut self) -> Result<()> {
        match self.config.get_api_token()? {
            Some(token) => {
                debug!("Persisted credential found, resolving identity");
                self.client.set_token(token);
                self.state = SessionState::Resolving;
                self.resolve().await
            }
            None => {
                debug!("No persisted credential");
                self.state = SessionState::Unauthenticated;
                Ok(())
            }
        }
    }

    /// Logs in with a fresh credential
    ///
    /// Persists the credential, attaches it to the client and resolves the
    /// identity. A credential the provider rejects is discarded again
    /// (fail-closed) and the session ends `Unauthenticated`.
    pub async fn login(&mut self, token: &str) -> Result<()> {
        info!("Logging in");
        self.config.set_api_token(token)?;
        self.client.set_token(token);
        self.state = SessionState::Resolving;
        self.resolve().await
    }

    /// Logs out synchronously: credential and identity are gone on return
    pub fn logout(&mut self) -> Result<()> {
        info!("Logging out");
        self.config.clear_api_token()?;
        self.client.clear_token();
        self.state = SessionState::Unauthenticated;
        self.is_owner = false;
        Ok(())
    }

    /// Resolves the identity behind the attached credential
    async fn resolve(&mut self) -> Result<()> {
        match self.client.current_user().await {
            Ok(identity) => {
                self.is_owner = identity.login == self.client.owner();
                info!(login = %identity.login, is_owner = self.is_owner, "Session authenticated");
                self.state = SessionState::Authenticated(identity);
                Ok(())
            }
            Err(e) => {
                // Fail closed: an unusable credential is "not logged in",
                // not a distinct error state.
                warn!("Identity resolution failed, discarding credential: {}", e);
                self.config.clear_api_token()?;
                self.client.clear_token();
                self.state = SessionState::Unauthenticated;
                self.is_owner = false;
                Ok(())
            }
        }
    }

    /// Returns the current lifecycle state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the resolved identity, if authenticated
    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// True when the resolved login matches the configured repository owner
    pub fn is_owner(&self) -> bool {
        self.is_owner
    }

    /// True only while identity resolution is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Resolving)
    }

    /// True when an identity has been resolved
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }
}
