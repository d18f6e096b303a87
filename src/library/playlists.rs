use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::LibrarySettings;
use crate::error::{Error, Result};

use super::names::sanitize_name;
use super::scan::caseless_cmp;

/// Named playlists stored as folders under `<root>/<playlists_dir>/`.
#[derive(Debug, Clone)]
pub struct PlaylistLibrary {
    root: PathBuf,
    playlists: PathBuf,
    settings: LibrarySettings,
}

impl PlaylistLibrary {
    /// Build a library rooted at `settings.root`, made absolute against the
    /// current directory.
    pub fn new(settings: &LibrarySettings) -> Result<Self> {
        let root = std::path::absolute(&settings.root)?;
        let playlists = root.join(&settings.playlists_dir);
        Ok(Self {
            root,
            playlists,
            settings: settings.clone(),
        })
    }

    /// Folder holding loose tracks.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &LibrarySettings {
        &self.settings
    }

    #[cfg(test)]
    pub fn playlists_root(&self) -> &Path {
        &self.playlists
    }

    pub fn playlist_dir(&self, name: &str) -> PathBuf {
        self.playlists.join(name)
    }

    /// Folder for a user-supplied playlist name, reduced to its final
    /// component. `..`, `.` and empty names are rejected.
    pub fn member_dir(&self, name: &str) -> Result<PathBuf> {
        Path::new(name)
            .file_name()
            .map(|n| self.playlists.join(n))
            .ok_or_else(|| Error::InvalidName(name.to_string()))
    }

    /// Create a playlist folder and return the sanitized name it was stored under.
    pub fn create(&self, raw: &str) -> Result<String> {
        let name = sanitize_name(raw);
        if name.is_empty() {
            return Err(Error::InvalidName(raw.to_string()));
        }

        fs::create_dir_all(&self.playlists)?;
        let dir = self.playlist_dir(&name);
        if dir.exists() {
            return Err(Error::AlreadyExists(name));
        }

        match fs::create_dir(&dir) {
            Ok(()) => {
                tracing::info!(playlist = %name, "created playlist");
                Ok(name)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(Error::AlreadyExists(name)),
            Err(e) => Err(e.into()),
        }
    }

    /// Playlist names, case-insensitive alphabetical. A missing playlists
    /// folder lists as empty.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.playlists) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort_by(|a, b| caseless_cmp(a, b));
        Ok(names)
    }

    /// File names directly inside a playlist folder, case-insensitive
    /// alphabetical.
    pub fn entries(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.member_dir(name)?;
        if !dir.is_dir() {
            return Err(Error::DirectoryNotFound(dir));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.path().is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort_by(|a, b| caseless_cmp(a, b));
        Ok(files)
    }

    /// Folders backing the named playlists. Names are reduced to their final
    /// component; `..` and empty names are dropped.
    pub fn playlist_dirs(&self, names: &[String]) -> Vec<PathBuf> {
        names.iter().filter_map(|n| self.member_dir(n).ok()).collect()
    }

    /// Paths of the named files inside one playlist folder.
    ///
    /// Both the playlist and the file names are reduced to their final
    /// component so a request cannot reach outside the playlist.
    pub fn entry_paths(&self, playlist: &str, files: &[String]) -> Result<Vec<PathBuf>> {
        let dir = self.member_dir(playlist)?;
        Ok(files
            .iter()
            .filter_map(|f| Path::new(f).file_name())
            .map(|f| dir.join(f))
            .collect())
    }
}

/// Permanently remove files and folders (recursively). Missing targets are
/// skipped. Every failure is collected; successful removals stay removed.
///
/// Returns how many targets were actually removed.
pub fn remove_paths(targets: &[PathBuf]) -> Result<usize> {
    let mut removed = 0;
    let mut failures = Vec::new();

    for target in targets {
        let result = match fs::symlink_metadata(target) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(target),
            Ok(_) => fs::remove_file(target),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::debug!(path = %target.display(), "removed");
                removed += 1;
            }
            Err(e) => {
                let label = target
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| target.display().to_string());
                tracing::warn!(path = %target.display(), error = %e, "failed to remove");
                failures.push(format!("{label}: {e}"));
            }
        }
    }

    if failures.is_empty() {
        Ok(removed)
    } else {
        Err(Error::Deletion { failures })
    }
}
