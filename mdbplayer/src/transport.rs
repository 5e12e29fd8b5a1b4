//! The media-element boundary the session drives

use crate::eq::EqStage;

/// Contract a concrete audio backend must satisfy
///
/// The session issues commands through this trait and receives progress
/// back through [`PlayerSession::on_time_update`] and
/// [`PlayerSession::on_ended`]. Implementations are expected to be cheap
/// to call; none of these operations may block.
///
/// [`PlayerSession::on_time_update`]: crate::PlayerSession::on_time_update
/// [`PlayerSession::on_ended`]: crate::PlayerSession::on_ended
pub trait PlaybackTransport {
    /// Points the backend at a new source URL, stopping any current output
    fn load(&mut self, url: &str);

    /// Starts or resumes output of the loaded source
    fn play(&mut self);

    /// Suspends output, keeping the position
    fn pause(&mut self);

    /// Applies a playback-rate multiplier (1.0 is normal speed)
    fn set_rate(&mut self, rate: f64);

    /// Installs the ordered equalizer stages; an empty slice means bypass
    fn apply_eq(&mut self, stages: &[EqStage]);
}

/// Transport that discards every command
///
/// Useful when the queue state machine is wanted without an audio backend.
#[derive(Debug, Default)]
pub struct NullTransport;

impl PlaybackTransport for NullTransport {
    fn load(&mut self, _url: &str) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn set_rate(&mut self, _rate: f64) {}
    fn apply_eq(&mut self, _stages: &[EqStage]) {}
}
