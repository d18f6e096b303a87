//! Filesystem-backed library: loose tracks under the root directory and one
//! folder per playlist under `playlists/`.
//!
//! There is no index beyond the directory listing itself; every lookup scans
//! the relevant folder.

mod model;
mod names;
mod playlists;
mod scan;

pub use model::Track;
pub(crate) use model::stem_of;
pub use names::sanitize_name;
pub use playlists::{PlaylistLibrary, remove_paths};
pub use scan::{audio_files, sorted_tracks};

#[cfg(test)]
mod tests;
