//! # mdbsession
//!
//! Session store for MDBlog: holds the bearer credential, resolves the
//! authenticated identity, and derives the owner capability flag.
//!
//! The store is an explicit, constructed object with an explicit lifecycle
//! (`init`, `login`, `logout`) and injected collaborators, not ambient
//! global state. The credential is the single piece of durable client
//! state; this crate is the only writer of it.
//!
//! ## State machine
//!
//! ```text
//! Unauthenticated --login/init--> Resolving --ok--> Authenticated
//!                                     |
//!                                     +--any failure--> Unauthenticated
//! ```
//!
//! Resolution failures are handled fail-closed: an unusable credential is
//! discarded and the session ends up `Unauthenticated`, never in a separate
//! error state.

mod store;

pub use store::{SessionState, SessionStore};

use thiserror::Error;

/// Crate-local Result type for mdbsession
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised by the session store
///
/// Only credential *storage* problems surface as errors; a credential the
/// provider refuses is not an error, it is the `Unauthenticated` state.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Persisting or clearing the stored credential failed
    #[error("Credential storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
