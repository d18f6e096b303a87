//! Error types shared by the resolver, the playlist library and the
//! playback controller.
//!
//! Everything that can go wrong in response to a user request is a variant
//! of [`Error`]; the runtime logs it and turns it into a user-visible notice.
//! Fetch adapters keep their own [`crate::fetch::FetchError`], which folds
//! into [`Error::Resolution`].

use std::path::PathBuf;

use crate::fetch::FetchError;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No local match and the fetch failed or produced nothing usable.
    #[error("could not resolve {query:?}: {reason}")]
    Resolution { query: String, reason: String },

    /// The playlist folder has no playable files.
    #[error("no audio files in {0}")]
    EmptyQueue(PathBuf),

    /// The playlist folder does not exist.
    #[error("folder not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// The name is empty once reserved characters are stripped.
    #[error("playlist name {0:?} is not valid after sanitizing")]
    InvalidName(String),

    #[error("a playlist named {0:?} already exists")]
    AlreadyExists(String),

    /// A fetched file would overwrite a different file in the target folder.
    #[error("refusing to overwrite existing file {0}")]
    DestinationExists(PathBuf),

    /// One or more removals failed; the rest were carried out.
    #[error("some entries could not be deleted:\n{}", failures.join("\n"))]
    Deletion { failures: Vec<String> },

    #[error("playback error: {0}")]
    Engine(String),

    /// Settings could not be read or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<::config::ConfigError> for Error {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl Error {
    pub fn resolution(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            query: query.into(),
            reason: reason.into(),
        }
    }

    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine(message.into())
    }

    /// Attach the query that was being resolved to a fetch failure.
    pub fn from_fetch(query: &str, err: FetchError) -> Self {
        Self::resolution(query, err.to_string())
    }
}
