//! Track resolution: query text in, local audio file out.
//!
//! The scope folder is the cache. A query is matched against the file stems
//! in that folder (exact normalized match first, then substring either way);
//! on a miss the fetch collaborator downloads the track, and playlist-scoped
//! requests move the download into the playlist folder.

mod matching;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::library::{PlaylistLibrary, Track, audio_files};

pub use matching::{find_local_match, normalize};

/// Where a query is looked up and where a fetched file ends up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The loose tracks in the library root.
    Library,
    /// One playlist folder, by name.
    Playlist(String),
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Library => f.write_str("library"),
            Scope::Playlist(name) => write!(f, "playlist {name:?}"),
        }
    }
}

pub struct TrackResolver {
    library: PlaylistLibrary,
    fetcher: Box<dyn Fetcher>,
}

impl TrackResolver {
    pub fn new(library: PlaylistLibrary, fetcher: Box<dyn Fetcher>) -> Self {
        Self { library, fetcher }
    }

    /// Find `query` in `scope`, fetching it when nothing local matches.
    pub fn resolve(&self, query: &str, scope: &Scope) -> Result<Track> {
        let wanted = normalize(query);
        if wanted.is_empty() {
            return Err(Error::resolution(query, "empty query"));
        }

        let (dir, exts) = match scope {
            Scope::Library => (
                self.library.root().to_path_buf(),
                self.library.settings().all_extensions(),
            ),
            Scope::Playlist(name) => {
                let dir = self.library.playlist_dir(name);
                fs::create_dir_all(&dir)?;
                (dir, self.library.settings().playlist_extensions())
            }
        };

        let candidates = audio_files(&dir, &exts);
        if let Some(hit) = find_local_match(&wanted, &candidates) {
            tracing::debug!(query, %scope, path = %hit.display(), "local match");
            return Ok(Track::new(hit.clone()));
        }

        let raw = query.trim();
        let fetched = self
            .fetcher
            .fetch(raw)
            .map_err(|e| Error::from_fetch(raw, e))?;
        if !fetched.is_file() {
            return Err(Error::resolution(
                raw,
                format!("fetch returned {} which is not a file", fetched.display()),
            ));
        }
        tracing::info!(query = raw, path = %fetched.display(), "fetched");

        let path = match scope {
            Scope::Library => fetched,
            Scope::Playlist(_) => move_into(&fetched, &dir)?,
        };
        Ok(Track::new(path))
    }
}

/// Move `src` into `dir`, keeping its file name.
///
/// Fails with [`Error::DestinationExists`] instead of overwriting a different
/// file of the same name; the source is left in place in that case.
pub fn move_into(src: &Path, dir: &Path) -> Result<PathBuf> {
    let file_name = src
        .file_name()
        .ok_or_else(|| Error::resolution(src.display().to_string(), "fetched path has no file name"))?;
    let target = dir.join(file_name);

    // Linking fails on an existing name, so nothing is ever replaced.
    match fs::hard_link(src, &target) {
        Ok(()) => fs::remove_file(src)?,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            if same_file(src, &target) {
                return Ok(target);
            }
            return Err(Error::DestinationExists(target));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(e.into()),
        // Likely a cross-device move or a filesystem without hard links.
        Err(e) => {
            tracing::debug!(error = %e, "link failed, copying instead");
            copy_new(src, &target)?;
            fs::remove_file(src)?;
        }
    }
    Ok(target)
}

/// Copy `src` to a `target` that must not exist yet.
fn copy_new(src: &Path, target: &Path) -> Result<()> {
    let mut from = fs::File::open(src)?;
    let mut to = match fs::OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(Error::DestinationExists(target.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    if let Err(e) = io::copy(&mut from, &mut to) {
        drop(to);
        let _ = fs::remove_file(target);
        return Err(e.into());
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
