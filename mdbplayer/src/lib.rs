//! Client-side playback session
//!
//! A single in-memory state machine owns the now-playing state: the queue,
//! the current track, play/pause, seek position, playback rate and the
//! equalizer preset. The actual audio output is behind the
//! [`PlaybackTransport`] trait; the session issues commands to it and is
//! fed progress through [`PlayerSession::on_time_update`] and
//! [`PlayerSession::on_ended`].
//!
//! Queue navigation has no wraparound: `previous` at the first entry and
//! `next` at the last one are no-ops, and a track ending with no successor
//! stops playback while keeping the track visible.

pub mod eq;
pub mod session;
pub mod transport;

pub use eq::{EqPreset, EqStage};
pub use session::{PlaybackState, PlayerSession, QueuedTrack};
pub use transport::{NullTransport, PlaybackTransport};
