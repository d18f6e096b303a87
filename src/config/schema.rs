use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/localstream/config.toml` or
/// `~/.config/localstream/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `LOCALSTREAM__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub sync: SyncSettings,
    pub fetch: FetchSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory holding loose tracks; playlists live underneath it.
    pub root: PathBuf,
    /// Name of the directory (inside `root`) holding one folder per playlist.
    pub playlists_dir: String,
    /// Audio extensions accepted everywhere (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Extra extensions accepted only for the loose library and playlist queues.
    pub library_extensions: Vec<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("music"),
            playlists_dir: "playlists".to_string(),
            extensions: vec![
                "m4a".into(),
                "webm".into(),
                "mp4".into(),
                "mp3".into(),
                "opus".into(),
            ],
            library_extensions: vec!["wav".into(), "flac".into()],
        }
    }
}

impl LibrarySettings {
    /// Extensions considered when matching inside a single playlist folder.
    pub fn playlist_extensions(&self) -> Vec<String> {
        normalize_extensions(&self.extensions)
    }

    /// Extensions considered for the loose library and for queue loading.
    pub fn all_extensions(&self) -> Vec<String> {
        let mut exts = normalize_extensions(&self.extensions);
        for e in normalize_extensions(&self.library_extensions) {
            if !exts.contains(&e) {
                exts.push(e);
            }
        }
        exts
    }
}

fn normalize_extensions(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether playlists start in shuffle mode when no flag is given.
    pub shuffle: bool,
    /// Whether playlists wrap around at the end when no flag is given.
    pub loop_list: bool,
    /// Initial output volume in `0.0..=1.0`.
    pub volume: f32,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            loop_list: true,
            volume: 0.9,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Period of the progress poll on the owner thread.
    pub poll_interval_ms: u64,
    /// A track counts as finished once this many seconds (or fewer) remain.
    pub end_threshold_secs: f64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            end_threshold_secs: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Downloader executable, looked up on `PATH` unless absolute.
    pub program: String,
    /// Prefer AAC in `.m4a` containers when the source offers it.
    pub prefer_m4a: bool,
    /// Extra arguments appended verbatim before the query.
    pub extra_args: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            prefer_m4a: true,
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "localstream=info".to_string(),
        }
    }
}
