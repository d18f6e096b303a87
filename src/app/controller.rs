use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::PlaybackEngine;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::library::{Track, sorted_tracks};

use super::model::{PlaybackSession, TransportState};
use super::notice::{Notice, StatusReport};
use super::queue::{PlayQueue, Step, covered_by_any};
use super::transport::{Progress, normalize_seconds, reached_end};

/// Owns the queue, the session and the engine. Lives on the runtime thread.
pub struct Controller<E> {
    engine: E,
    queue: PlayQueue,
    session: PlaybackSession,
    progress: Progress,
    end_threshold: f64,
    extensions: Vec<String>,
    rng: StdRng,
    notices: Sender<Notice>,
}

impl<E: PlaybackEngine> Controller<E> {
    pub fn new(engine: E, settings: &Settings, notices: Sender<Notice>) -> Self {
        Self::with_rng(engine, settings, notices, StdRng::from_os_rng())
    }

    pub fn with_rng(engine: E, settings: &Settings, notices: Sender<Notice>, rng: StdRng) -> Self {
        let mut engine = engine;
        engine.set_volume(settings.playback.volume.clamp(0.0, 1.0));
        Self {
            engine,
            queue: PlayQueue::new(),
            session: PlaybackSession::default(),
            progress: Progress::default(),
            end_threshold: settings.sync.end_threshold_secs,
            extensions: settings.library.all_extensions(),
            rng,
            notices,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    #[cfg(test)]
    pub fn queue(&self) -> &PlayQueue {
        &self.queue
    }

    #[cfg(test)]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn state(&self) -> TransportState {
        self.session.state()
    }

    fn notify(&self, notice: Notice) {
        // The printer may already be gone during shutdown.
        let _ = self.notices.send(notice);
    }

    /// Replace the queue with the audio files in `dir` and start the first one.
    pub fn load_queue(&mut self, dir: &Path, shuffle: bool, looping: bool) -> Result<()> {
        if !dir.is_dir() {
            return Err(Error::DirectoryNotFound(dir.to_path_buf()));
        }
        let tracks = sorted_tracks(dir, &self.extensions);
        if tracks.is_empty() {
            return Err(Error::EmptyQueue(dir.to_path_buf()));
        }

        tracing::info!(dir = %dir.display(), tracks = tracks.len(), shuffle, looping, "queue loaded");
        self.queue.replace(tracks, shuffle, looping);
        self.advance();
        Ok(())
    }

    /// Move to the next track under the queue's shuffle and loop policy.
    pub fn advance(&mut self) {
        match self.queue.step(&mut self.rng) {
            Step::Empty => {}
            Step::Play(track) => self.start(track),
            Step::Wrapped(track) => {
                self.notify(Notice::QueueReset);
                self.start(track);
            }
            Step::Finished => {
                self.engine.stop();
                self.clear_session();
                self.notify(Notice::PlaylistFinished);
            }
        }
    }

    /// Play a resolved track directly. The queue is left alone.
    pub fn play_single(&mut self, track: Track) {
        self.start(track);
    }

    fn start(&mut self, track: Track) {
        match self.engine.play(&track.path) {
            Ok(()) => {
                tracing::info!(path = %track.path.display(), "playing");
                let name = track.name.clone();
                self.session.begin(track);
                self.progress = Progress::default();
                self.notify(Notice::Playing(name));
            }
            Err(e) => {
                tracing::error!(path = %track.path.display(), error = %e, "playback failed");
                self.engine.stop();
                self.clear_session();
                self.notify(Notice::Error(e.to_string()));
            }
        }
    }

    fn clear_session(&mut self) {
        self.session.reset();
        self.progress = Progress::default();
    }

    pub fn skip(&mut self) {
        if !self.session.playing {
            self.notify(Notice::NothingPlaying);
            return;
        }
        self.advance();
        let name = self.session.current_name().map(str::to_string);
        self.notify(Notice::Skipped(name));
    }

    pub fn pause(&mut self) {
        if self.state() == TransportState::Playing {
            self.engine.pause();
            self.session.playing = false;
            self.notify(Notice::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state() == TransportState::Paused {
            self.engine.resume();
            self.session.playing = true;
            self.notify(Notice::Resumed);
        }
    }

    pub fn pause_resume(&mut self) {
        match self.state() {
            TransportState::Playing => self.pause(),
            TransportState::Paused => self.resume(),
            TransportState::Idle => self.notify(Notice::NothingPlaying),
        }
    }

    pub fn stop(&mut self) {
        self.engine.stop();
        self.clear_session();
        self.notify(Notice::Stopped);
    }

    pub fn begin_seek(&mut self) {
        self.session.user_seeking = true;
    }

    /// Jump to `percent` of the current track. Ignored while the length is unknown.
    pub fn seek_to_percent(&mut self, percent: f64) {
        let percent = normalize_seconds(percent).min(100.0);
        let total = self.session.total_secs;
        if total > 0.0 {
            let target = percent / 100.0 * total;
            tracing::debug!(percent, target, "seek");
            self.engine.seek(target);
        }
        self.session.user_seeking = false;
    }

    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.engine.set_volume(volume);
        self.notify(Notice::Volume(volume));
    }

    /// One poll: refresh the position and advance when the track is
    /// about to end.
    pub fn tick(&mut self) {
        let (current, total) = self.engine.position();
        let current = normalize_seconds(current);
        let total = normalize_seconds(total);

        self.session.current_secs = current;
        self.session.total_secs = total;
        self.progress.elapsed = current;
        self.progress.total = total;
        if !self.session.user_seeking && total > 0.0 {
            self.progress.fraction = (current / total).clamp(0.0, 1.0);
        }

        if self.session.playing && reached_end(current, total, self.end_threshold) {
            tracing::debug!(current, total, "end of track reached");
            self.session.playing = false;
            self.advance();
        }
    }

    /// The engine ran out of samples for `path`.
    pub fn on_engine_finished(&mut self, path: &Path) {
        if !self.session.is_current(path) {
            tracing::debug!(path = %path.display(), "ignoring end of a track no longer current");
            return;
        }
        if self.session.playing {
            self.session.playing = false;
            self.advance();
        } else {
            self.clear_session();
            self.notify(Notice::Finished);
        }
    }

    pub fn on_engine_failed(&mut self, path: &Path, message: &str) {
        if self.session.is_current(path) {
            self.clear_session();
        }
        self.notify(Notice::Error(format!("{}: {message}", path.display())));
    }

    /// Invalidate everything at or under `targets` before it is deleted.
    pub fn forget(&mut self, targets: &[PathBuf]) {
        let removed = self.queue.forget(targets);
        if removed > 0 {
            tracing::debug!(removed, "dropped queue entries");
        }
        let current_hit = self
            .session
            .current
            .as_ref()
            .is_some_and(|t| covered_by_any(&t.path, targets));
        if current_hit {
            self.engine.stop();
            self.clear_session();
            self.notify(Notice::Stopped);
        }
    }

    pub fn report(&self) {
        self.notify(Notice::Status(StatusReport {
            state: self.state(),
            track: self.session.current_name().map(str::to_string),
            progress: self.progress,
            queue_len: self.queue.len(),
            cursor: self.queue.cursor(),
            shuffle: self.queue.shuffle(),
            looping: self.queue.looping(),
        }));
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
        self.clear_session();
    }
}
