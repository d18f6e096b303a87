//! Status messages published by the runtime.

use std::fmt;

use super::model::TransportState;
use super::transport::Progress;

/// Snapshot answered to a status request.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub state: TransportState,
    pub track: Option<String>,
    pub progress: Progress,
    pub queue_len: usize,
    pub cursor: isize,
    pub shuffle: bool,
    pub looping: bool,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.track {
            Some(name) => write!(f, "{}: {name} {}", self.state, self.progress)?,
            None => write!(f, "{}", self.state)?,
        }
        if self.queue_len > 0 {
            write!(f, " [queue {}/{}", self.cursor + 1, self.queue_len)?;
            if self.shuffle {
                f.write_str(", shuffle")?;
            }
            if self.looping {
                f.write_str(", loop")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Searching(String),
    Playing(String),
    Downloaded(String),
    Added { playlist: String, name: String },
    Paused,
    Resumed,
    Stopped,
    Finished,
    Skipped(Option<String>),
    NothingPlaying,
    QueueReset,
    PlaylistFinished,
    Volume(f32),
    Status(StatusReport),
    PlaylistCreated(String),
    Playlists(Vec<String>),
    Entries { playlist: String, files: Vec<String> },
    Removed { what: String, count: usize },
    AlreadyResolving(String),
    Help(&'static str),
    Error(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Searching(query) => write!(f, "Searching: {query}"),
            Notice::Playing(name) => write!(f, "Playing: {name}"),
            Notice::Downloaded(name) => write!(f, "Downloaded: {name}"),
            Notice::Added { playlist, name } => write!(f, "Added to {playlist}: {name}"),
            Notice::Paused => f.write_str("Paused."),
            Notice::Resumed => f.write_str("Playing…"),
            Notice::Stopped => f.write_str("Stopped."),
            Notice::Finished => f.write_str("Finished."),
            Notice::Skipped(name) => {
                write!(f, "Skipped to: {}", name.as_deref().unwrap_or("unknown"))
            }
            Notice::NothingPlaying => f.write_str("Nothing is currently playing."),
            Notice::QueueReset => f.write_str("Queue reset."),
            Notice::PlaylistFinished => f.write_str("Playlist finished."),
            Notice::Volume(v) => write!(f, "Volume: {:.0}%", v * 100.0),
            Notice::Status(report) => write!(f, "{report}"),
            Notice::PlaylistCreated(name) => write!(f, "Created playlist: {name}"),
            Notice::Playlists(names) if names.is_empty() => f.write_str("No playlists yet."),
            Notice::Playlists(names) => write!(f, "Playlists:\n  {}", names.join("\n  ")),
            Notice::Entries { playlist, files } if files.is_empty() => {
                write!(f, "{playlist} is empty.")
            }
            Notice::Entries { playlist, files } => {
                write!(f, "{playlist}:\n  {}", files.join("\n  "))
            }
            Notice::Removed { what, count } => write!(f, "Deleted {count} from {what}."),
            Notice::AlreadyResolving(query) => write!(f, "Already looking for: {query}"),
            Notice::Help(text) => f.write_str(text),
            Notice::Error(message) => write!(f, "Error: {message}"),
        }
    }
}
