use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::{Error, Result};

use super::PlaybackEngine;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, EngineEvent, PlaybackHandle, PlaybackInfo};

/// `rodio`-backed engine. Commands go to a dedicated audio thread; position
/// is read back from a shared snapshot.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
    quit_fade_out: Duration,
    /// Bumped on every play and stop; snapshots from older generations are
    /// treated as empty.
    generation: u64,
}

impl AudioPlayer {
    /// Open the default output device and start the audio thread.
    ///
    /// End-of-track and decode failures are delivered on `events`.
    pub fn spawn<T>(events: Sender<T>, quit_fade_out: Duration) -> Result<Self>
    where
        T: From<EngineEvent> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, playback_info.clone(), events, ready_tx);

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(message)) => {
                let _ = audio_handle.join();
                return Err(Error::engine(format!("no audio output device: {message}")));
            }
            Err(_) => return Err(Error::engine("audio thread exited during startup")),
        }

        Ok(Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
            quit_fade_out,
            generation: 0,
        })
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            tracing::warn!("audio thread is gone; command dropped");
        }
    }

    /// Start a new generation and overwrite the snapshot right away, so the
    /// previous track's position is never attributed to the next one.
    fn reset_snapshot(&mut self, path: Option<&Path>) {
        self.generation += 1;
        if let Ok(mut info) = self.playback.lock() {
            *info = PlaybackInfo {
                path: path.map(Path::to_path_buf),
                playing: path.is_some(),
                generation: self.generation,
                ..PlaybackInfo::default()
            };
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl PlaybackEngine for AudioPlayer {
    fn play(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(Error::engine(format!("no such file: {}", path.display())));
        }
        self.reset_snapshot(Some(path));
        self.tx
            .send(AudioCmd::Play {
                path: path.to_path_buf(),
                generation: self.generation,
            })
            .map_err(|_| Error::engine("audio thread is gone"))
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn resume(&mut self) {
        self.send(AudioCmd::Resume);
    }

    fn stop(&mut self) {
        self.reset_snapshot(None);
        self.send(AudioCmd::Stop);
    }

    fn seek(&mut self, seconds: f64) {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self.send(AudioCmd::Seek(Duration::from_secs_f64(seconds)));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(AudioCmd::SetVolume(volume.clamp(0.0, 1.0)));
    }

    fn position(&self) -> (f64, f64) {
        self.playback
            .lock()
            .ok()
            .filter(|info| info.generation == self.generation)
            .map(|info| info.position_secs())
            .unwrap_or((0.0, 0.0))
    }

    fn shutdown(&mut self) {
        self.quit_softly(self.quit_fade_out);
    }
}
