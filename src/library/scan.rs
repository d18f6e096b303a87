use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::model::Track;

/// True when `path` carries one of `exts` (lowercase, without dot).
pub fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Audio files directly inside `dir`, in directory-iteration order.
///
/// Subdirectories are not descended into; playlists never nest.
pub fn audio_files(dir: &Path, exts: &[String]) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && is_audio_file(e.path(), exts))
        .map(|e| e.into_path())
        .collect()
}

/// Audio files directly inside `dir` as tracks, sorted case-insensitively
/// by file name.
pub fn sorted_tracks(dir: &Path, exts: &[String]) -> Vec<Track> {
    let mut tracks: Vec<Track> = audio_files(dir, exts).into_iter().map(Track::new).collect();
    tracks.sort_by(|a, b| caseless_cmp(&a.name, &b.name));
    tracks
}

pub(crate) fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
