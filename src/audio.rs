//! Playback engine seam.
//!
//! [`PlaybackEngine`] is the narrow contract the controller drives. The
//! shipped implementation, [`AudioPlayer`], runs a `rodio` sink on its own
//! thread and reports end-of-track through the runtime's event channel.

mod player;
mod sink;
mod thread;
mod types;

use std::path::Path;

use crate::error::Result;

pub use player::AudioPlayer;
pub use types::EngineEvent;

/// Something that can play one file at a time and report its position.
pub trait PlaybackEngine {
    /// Replace whatever is playing with `path`, starting from the beginning.
    fn play(&mut self, path: &Path) -> Result<()>;
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    /// Jump to an absolute position in seconds.
    fn seek(&mut self, seconds: f64);
    /// Output volume in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
    /// `(current_seconds, total_seconds)`; either may be `0.0` when unknown.
    fn position(&self) -> (f64, f64);
    /// Release the output. Called once when the program exits.
    fn shutdown(&mut self) {
        self.stop();
    }
}
