//! Audio-related small types and handles.
//!
//! Commands sent to the audio thread, the playback snapshot it publishes and
//! the events it emits.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Start playing `path`. `generation` tags the snapshots published for it.
    Play { path: PathBuf, generation: u64 },
    Pause,
    Resume,
    /// Stop playback immediately.
    Stop,
    /// Jump to an absolute position.
    Seek(Duration),
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the owner thread.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// File currently loaded in the sink (if any).
    pub path: Option<PathBuf>,
    /// Elapsed playback time for the current file.
    pub elapsed: Duration,
    /// Length of the current file, when the container reports one.
    pub total: Option<Duration>,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Which `Play` command this snapshot belongs to.
    pub generation: u64,
}

impl PlaybackInfo {
    /// `(current, total)` in seconds, `0.0` standing in for unknown values.
    pub fn position_secs(&self) -> (f64, f64) {
        if self.path.is_none() {
            return (0.0, 0.0);
        }
        let total = self.total.map_or(0.0, |d| d.as_secs_f64());
        (self.elapsed.as_secs_f64(), total)
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Notifications from the audio thread, delivered through the runtime channel.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The file ran out of samples on its own.
    Finished(PathBuf),
    /// The file could not be opened or decoded.
    Failed { path: PathBuf, message: String },
}
