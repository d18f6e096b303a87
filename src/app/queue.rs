//! The play queue: an ordered track list, a cursor and the advance policy.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::library::Track;

/// Result of moving the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Play(Track),
    /// Sequential looping ran off the end and restarted at the first track.
    Wrapped(Track),
    /// Sequential, not looping, and the last track has been played.
    Finished,
    Empty,
}

/// Ordered tracks with a cursor in `-1..len`; `-1` means nothing played yet.
#[derive(Debug, Clone)]
pub struct PlayQueue {
    tracks: Vec<Track>,
    cursor: isize,
    shuffle: bool,
    looping: bool,
}

impl Default for PlayQueue {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            cursor: -1,
            shuffle: false,
            looping: false,
        }
    }
}

impl PlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new track list and modes; the cursor goes back before the start.
    pub fn replace(&mut self, tracks: Vec<Track>, shuffle: bool, looping: bool) {
        self.tracks = tracks;
        self.cursor = -1;
        self.shuffle = shuffle;
        self.looping = looping;
    }

    #[cfg(test)]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Move the cursor according to the shuffle and loop flags.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Step {
        let len = self.tracks.len();
        if len == 0 {
            return Step::Empty;
        }

        if self.shuffle {
            let mut next = rng.random_range(0..len);
            if len > 1 && self.cursor >= 0 {
                while next as isize == self.cursor {
                    next = rng.random_range(0..len);
                }
            }
            self.cursor = next as isize;
            return Step::Play(self.tracks[next].clone());
        }

        let next = (self.cursor + 1) as usize;
        if next < len {
            self.cursor = next as isize;
            Step::Play(self.tracks[next].clone())
        } else if self.looping {
            self.cursor = 0;
            Step::Wrapped(self.tracks[0].clone())
        } else {
            self.cursor = len as isize - 1;
            Step::Finished
        }
    }

    /// Drop every entry at or beneath one of `targets`, keeping order.
    /// Returns how many entries went away.
    pub fn forget(&mut self, targets: &[PathBuf]) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|t| !covered_by_any(&t.path, targets));
        self.cursor = self.cursor.min(self.tracks.len() as isize - 1);
        before - self.tracks.len()
    }
}

/// Whether `path` is one of `targets` or lives under one of them.
///
/// Both sides are canonicalized when they exist, so symlinked or relative
/// spellings of the same file still match.
pub(crate) fn covered_by_any(path: &Path, targets: &[PathBuf]) -> bool {
    let canonical = fs::canonicalize(path).ok();
    targets.iter().any(|target| {
        if path.starts_with(target) {
            return true;
        }
        match (&canonical, fs::canonicalize(target)) {
            (Some(p), Ok(t)) => p.starts_with(t),
            _ => false,
        }
    })
}
