//! Now-playing state machine
//!
//! One [`PlayerSession`] exists per client. UI code issues commands and
//! reads snapshots; it never mutates the state directly. The injected
//! [`PlaybackTransport`] is the only side-effect channel.

use crate::eq::EqPreset;
use crate::transport::PlaybackTransport;
use tracing::debug;

/// One queued audio asset
///
/// Identity is the full `path`: two tracks sharing a filename must never be
/// confused in "is this the current track" comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedTrack {
    pub name: String,
    pub path: String,
    pub url: String,
}

/// Read-only snapshot of the session state
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current: Option<QueuedTrack>,
    pub queue: Vec<QueuedTrack>,
    pub is_playing: bool,
    /// Fraction of the track elapsed, 0.0 at the start, 1.0 at the end
    pub position: f64,
    pub rate: f64,
    pub eq: EqPreset,
}

/// Playback session driving an injected transport
pub struct PlayerSession<T: PlaybackTransport> {
    transport: T,
    current: Option<QueuedTrack>,
    queue: Vec<QueuedTrack>,
    is_playing: bool,
    position: f64,
    rate: f64,
    eq: EqPreset,
}

impl<T: PlaybackTransport> PlayerSession<T> {
    /// Creates a stopped session with an empty queue
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            current: None,
            queue: Vec::new(),
            is_playing: false,
            position: 0.0,
            rate: 1.0,
            eq: EqPreset::Flat,
        }
    }

    /// Snapshot of the full state, for display
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            current: self.current.clone(),
            queue: self.queue.clone(),
            is_playing: self.is_playing,
            position: self.position,
            rate: self.rate,
            eq: self.eq,
        }
    }

    pub fn current(&self) -> Option<&QueuedTrack> {
        self.current.as_ref()
    }

    pub fn queue(&self) -> &[QueuedTrack] {
        &self.queue
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn eq_preset(&self) -> EqPreset {
        self.eq
    }

    /// Index of the current track inside the queue, matched by path
    fn current_index(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.queue.iter().position(|t| t.path == current.path)
    }

    /// Starts playing a track from the start
    ///
    /// The transport is pointed at the track's URL and the session's rate
    /// and equalizer settings are re-applied, since loading a new source
    /// resets the backend.
    pub fn play_track(&mut self, track: QueuedTrack) {
        debug!(path = %track.path, "Playing track");
        self.transport.load(&track.url);
        self.transport.set_rate(self.rate);
        self.transport.apply_eq(&self.eq.stages());
        self.transport.play();
        self.current = Some(track);
        self.is_playing = true;
        self.position = 0.0;
    }

    /// Flips between playing and paused; a no-op without a current track
    pub fn toggle_play(&mut self) {
        if self.current.is_none() {
            return;
        }
        if self.is_playing {
            self.transport.pause();
            self.is_playing = false;
        } else {
            self.transport.play();
            self.is_playing = true;
        }
    }

    /// End-of-track policy: play the successor, or stop at the end
    ///
    /// Stopping retains the current track for display; only `is_playing`
    /// drops. Called by [`PlayerSession::on_ended`].
    pub fn advance(&mut self) {
        match self.successor() {
            Some(next) => self.play_track(next),
            None => {
                debug!("End of queue reached, stopping");
                self.transport.pause();
                self.is_playing = false;
            }
        }
    }

    /// Moves to the next queue entry; a no-op at the last one
    pub fn next(&mut self) {
        if let Some(next) = self.successor() {
            self.play_track(next);
        }
    }

    /// Moves to the previous queue entry; a no-op at the first one
    pub fn previous(&mut self) {
        let prev = self
            .current_index()
            .filter(|&i| i > 0)
            .map(|i| self.queue[i - 1].clone());
        if let Some(prev) = prev {
            self.play_track(prev);
        }
    }

    fn successor(&self) -> Option<QueuedTrack> {
        let i = self.current_index()?;
        self.queue.get(i + 1).cloned()
    }

    /// Replaces the queue without touching the current track or transport
    ///
    /// A current track absent from the new queue stays visible; navigation
    /// from it is a no-op until another track is played.
    pub fn set_queue(&mut self, tracks: Vec<QueuedTrack>) {
        debug!(len = tracks.len(), "Queue replaced");
        self.queue = tracks;
    }

    /// Records a seek position, clamped to the unit interval
    pub fn set_position(&mut self, fraction: f64) {
        self.position = fraction.clamp(0.0, 1.0);
    }

    /// Sets the playback-rate multiplier
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
        self.transport.set_rate(rate);
    }

    /// Switches the equalizer preset
    pub fn set_eq_preset(&mut self, preset: EqPreset) {
        debug!(preset = preset.name(), "Equalizer preset changed");
        self.eq = preset;
        self.transport.apply_eq(&preset.stages());
    }

    /// Stops playback and forgets the queue and current track
    pub fn clear(&mut self) {
        self.transport.pause();
        self.current = None;
        self.queue.clear();
        self.is_playing = false;
        self.position = 0.0;
    }

    /// Progress report from the transport
    pub fn on_time_update(&mut self, fraction: f64) {
        self.position = fraction.clamp(0.0, 1.0);
    }

    /// Natural end-of-track report from the transport
    pub fn on_ended(&mut self) {
        self.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Command {
        Load(String),
        Play,
        Pause,
        SetRate(f64),
        ApplyEq(usize),
    }

    /// Transport fake that records every command it receives
    struct RecordingTransport {
        log: Rc<RefCell<Vec<Command>>>,
    }

    impl PlaybackTransport for RecordingTransport {
        fn load(&mut self, url: &str) {
            self.log.borrow_mut().push(Command::Load(url.to_string()));
        }
        fn play(&mut self) {
            self.log.borrow_mut().push(Command::Play);
        }
        fn pause(&mut self) {
            self.log.borrow_mut().push(Command::Pause);
        }
        fn set_rate(&mut self, rate: f64) {
            self.log.borrow_mut().push(Command::SetRate(rate));
        }
        fn apply_eq(&mut self, stages: &[crate::eq::EqStage]) {
            self.log.borrow_mut().push(Command::ApplyEq(stages.len()));
        }
    }

    fn session() -> (Rc<RefCell<Vec<Command>>>, PlayerSession<RecordingTransport>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let transport = RecordingTransport { log: log.clone() };
        (log, PlayerSession::new(transport))
    }

    fn track(name: &str) -> QueuedTrack {
        QueuedTrack {
            name: format!("{}.mp3", name),
            path: format!("public/music/{}.mp3", name),
            url: format!("https://raw.example.com/{}.mp3", name),
        }
    }

    #[test]
    fn test_play_track_loads_and_plays() {
        let (log, mut session) = session();
        session.play_track(track("a"));

        assert!(session.is_playing());
        assert_eq!(session.position(), 0.0);
        assert_eq!(session.current().unwrap().name, "a.mp3");
        let commands = log.borrow();
        assert_eq!(commands[0], Command::Load("https://raw.example.com/a.mp3".into()));
        assert_eq!(*commands.last().unwrap(), Command::Play);
    }

    #[test]
    fn test_toggle_play_without_current_is_noop() {
        let (log, mut session) = session();
        session.toggle_play();
        assert!(!session.is_playing());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_toggle_play_flips_state() {
        let (log, mut session) = session();
        session.play_track(track("a"));
        session.toggle_play();
        assert!(!session.is_playing());
        assert_eq!(*log.borrow().last().unwrap(), Command::Pause);
        session.toggle_play();
        assert!(session.is_playing());
    }

    #[test]
    fn test_advance_plays_successor() {
        // setQueue([A,B,C]); playTrack(B); advance() leaves C playing
        let (_log, mut session) = session();
        session.set_queue(vec![track("a"), track("b"), track("c")]);
        session.play_track(track("b"));
        session.advance();

        assert_eq!(session.current().unwrap().name, "c.mp3");
        assert!(session.is_playing());
    }

    #[test]
    fn test_advance_at_last_stops_but_retains_current() {
        let (log, mut session) = session();
        session.set_queue(vec![track("a"), track("b")]);
        session.play_track(track("b"));
        session.advance();

        assert!(!session.is_playing());
        assert_eq!(session.current().unwrap().name, "b.mp3");
        assert_eq!(*log.borrow().last().unwrap(), Command::Pause);
    }

    #[test]
    fn test_next_at_last_is_noop() {
        let (log, mut session) = session();
        session.set_queue(vec![track("a"), track("b")]);
        session.play_track(track("b"));
        let before = log.borrow().len();
        session.next();

        assert_eq!(session.current().unwrap().name, "b.mp3");
        assert!(session.is_playing());
        assert_eq!(log.borrow().len(), before);
    }

    #[test]
    fn test_previous_at_first_is_noop() {
        let (log, mut session) = session();
        session.set_queue(vec![track("a"), track("b")]);
        session.play_track(track("a"));
        let before = log.borrow().len();
        session.previous();

        assert_eq!(session.current().unwrap().name, "a.mp3");
        assert_eq!(log.borrow().len(), before);
    }

    #[test]
    fn test_previous_moves_back() {
        let (_log, mut session) = session();
        session.set_queue(vec![track("a"), track("b")]);
        session.play_track(track("b"));
        session.previous();
        assert_eq!(session.current().unwrap().name, "a.mp3");
    }

    #[test]
    fn test_identity_is_by_path_not_name() {
        // Two tracks with the same filename in different directories
        let covers = QueuedTrack {
            name: "song.mp3".to_string(),
            path: "public/music/covers/song.mp3".to_string(),
            url: "https://raw.example.com/covers/song.mp3".to_string(),
        };
        let originals = QueuedTrack {
            name: "song.mp3".to_string(),
            path: "public/music/originals/song.mp3".to_string(),
            url: "https://raw.example.com/originals/song.mp3".to_string(),
        };

        let (_log, mut session) = session();
        session.set_queue(vec![covers.clone(), originals.clone(), track("z")]);
        session.play_track(originals);
        session.advance();

        // Matching by name would resolve to the first "song.mp3" and
        // advance to the second one; path matching reaches "z"
        assert_eq!(session.current().unwrap().path, "public/music/z.mp3");
    }

    #[test]
    fn test_set_queue_keeps_current_and_playing() {
        let (_log, mut session) = session();
        session.play_track(track("orphan"));
        session.set_queue(vec![track("a"), track("b")]);

        assert_eq!(session.current().unwrap().name, "orphan.mp3");
        assert!(session.is_playing());
        // The orphaned current track has no position in the queue:
        // navigation from it is a no-op
        session.next();
        assert_eq!(session.current().unwrap().name, "orphan.mp3");
    }

    #[test]
    fn test_position_is_clamped() {
        let (_log, mut session) = session();
        session.set_position(1.7);
        assert_eq!(session.position(), 1.0);
        session.set_position(-0.3);
        assert_eq!(session.position(), 0.0);
        session.on_time_update(0.25);
        assert_eq!(session.position(), 0.25);
    }

    #[test]
    fn test_rate_and_eq_reach_transport() {
        let (log, mut session) = session();
        session.set_rate(1.5);
        session.set_eq_preset(EqPreset::Rock);

        assert_eq!(session.rate(), 1.5);
        assert_eq!(session.eq_preset(), EqPreset::Rock);
        let commands = log.borrow();
        assert!(commands.contains(&Command::SetRate(1.5)));
        assert!(commands.contains(&Command::ApplyEq(EqPreset::Rock.stages().len())));
    }

    #[test]
    fn test_rate_and_eq_reapplied_on_load() {
        let (log, mut session) = session();
        session.set_rate(2.0);
        session.set_eq_preset(EqPreset::Bass);
        log.borrow_mut().clear();

        session.play_track(track("a"));
        let commands = log.borrow();
        assert!(commands.contains(&Command::SetRate(2.0)));
        assert!(commands.contains(&Command::ApplyEq(EqPreset::Bass.stages().len())));
    }

    #[test]
    fn test_on_ended_advances() {
        let (_log, mut session) = session();
        session.set_queue(vec![track("a"), track("b")]);
        session.play_track(track("a"));
        session.on_ended();
        assert_eq!(session.current().unwrap().name, "b.mp3");
        assert!(session.is_playing());
    }

    #[test]
    fn test_clear_resets_everything() {
        let (_log, mut session) = session();
        session.set_queue(vec![track("a")]);
        session.play_track(track("a"));
        session.clear();

        let state = session.state();
        assert_eq!(state.current, None);
        assert!(state.queue.is_empty());
        assert!(!state.is_playing);
        assert_eq!(state.position, 0.0);
    }
}
