//! Fakes for the collaborator traits, shared by unit tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::audio::PlaybackEngine;
use crate::error::{Error, Result};
use crate::fetch::{FetchError, Fetcher};

/// Everything the fake engine was asked to do.
#[derive(Debug, Default)]
pub struct EngineLog {
    pub played: Vec<PathBuf>,
    pub pauses: usize,
    pub resumes: usize,
    pub stops: usize,
    pub seeks: Vec<f64>,
    pub volume: Option<f32>,
    pub position: (f64, f64),
    pub fail_play: bool,
}

/// In-memory engine. Clones share the same log so tests can inspect it
/// after handing the engine to a controller.
#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    pub log: Arc<Mutex<EngineLog>>,
}

impl FakeEngine {
    pub fn set_position(&self, current: f64, total: f64) {
        self.log.lock().unwrap().position = (current, total);
    }

    pub fn played(&self) -> Vec<PathBuf> {
        self.log.lock().unwrap().played.clone()
    }

    pub fn play_count(&self) -> usize {
        self.log.lock().unwrap().played.len()
    }

    pub fn fail_next_plays(&self) {
        self.log.lock().unwrap().fail_play = true;
    }
}

impl PlaybackEngine for FakeEngine {
    fn play(&mut self, path: &Path) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        if log.fail_play {
            return Err(Error::engine("fake engine refused"));
        }
        log.played.push(path.to_path_buf());
        log.position = (0.0, 0.0);
        Ok(())
    }

    fn pause(&mut self) {
        self.log.lock().unwrap().pauses += 1;
    }

    fn resume(&mut self) {
        self.log.lock().unwrap().resumes += 1;
    }

    fn stop(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.stops += 1;
        log.position = (0.0, 0.0);
    }

    fn seek(&mut self, seconds: f64) {
        self.log.lock().unwrap().seeks.push(seconds);
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.lock().unwrap().volume = Some(volume);
    }

    fn position(&self) -> (f64, f64) {
        self.log.lock().unwrap().position
    }
}

/// Fetcher that writes a file named after the query into `dir` and counts
/// its calls.
#[derive(Debug, Clone)]
pub struct FakeFetcher {
    pub dir: PathBuf,
    pub calls: Arc<AtomicUsize>,
    pub fail: bool,
    pub delay: Duration,
}

impl FakeFetcher {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
            delay: Duration::ZERO,
        }
    }

    pub fn failing(dir: &Path) -> Self {
        Self {
            fail: true,
            ..Self::new(dir)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, query: &str) -> std::result::Result<PathBuf, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.fail {
            return Err(FetchError::Failed("no results".into()));
        }
        std::fs::create_dir_all(&self.dir).map_err(|_| FetchError::NoOutput)?;
        let path = self.dir.join(format!("{query}.m4a"));
        std::fs::write(&path, b"fake audio").map_err(|_| FetchError::NoOutput)?;
        Ok(path)
    }
}
