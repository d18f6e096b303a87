//! Session types: what is loaded and whether it is audible.

use crate::library::Track;

/// Transport state, derived from the session rather than stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Idle,
    Playing,
    Paused,
}

impl std::fmt::Display for TransportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TransportState::Idle => "Idle",
            TransportState::Playing => "Playing",
            TransportState::Paused => "Paused",
        })
    }
}

/// The current track and the last position read from the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSession {
    pub current: Option<Track>,
    pub playing: bool,
    /// Set while the user drags the seek control; progress updates pause.
    pub user_seeking: bool,
    pub current_secs: f64,
    pub total_secs: f64,
}

impl PlaybackSession {
    pub fn state(&self) -> TransportState {
        match (&self.current, self.playing) {
            (None, _) => TransportState::Idle,
            (Some(_), true) => TransportState::Playing,
            (Some(_), false) => TransportState::Paused,
        }
    }

    /// Mark `track` as loaded and audible from the start.
    pub fn begin(&mut self, track: Track) {
        *self = Self {
            current: Some(track),
            playing: true,
            ..Self::default()
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_current(&self, path: &std::path::Path) -> bool {
        self.current.as_ref().is_some_and(|t| t.path == path)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.name.as_str())
    }
}
