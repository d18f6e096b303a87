//! Fetch collaborator: turns a search string or link into a local audio file.
//!
//! The extraction itself is delegated to an external downloader (`yt-dlp` by
//! default). This module only builds its command line and finds the file it
//! produced.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

use crate::config::FetchSettings;
use crate::library::audio_files;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("downloader failed: {0}")]
    Failed(String),

    #[error("downloader did not return a file path")]
    NoOutput,
}

/// Anything that can produce a local file for a query.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, query: &str) -> Result<PathBuf, FetchError>;
}

/// Fetcher backed by a `yt-dlp` compatible command-line tool.
#[derive(Debug, Clone)]
pub struct CommandFetcher {
    program: String,
    output_dir: PathBuf,
    prefer_m4a: bool,
    extra_args: Vec<String>,
    extensions: Vec<String>,
}

impl CommandFetcher {
    /// Downloads land in `output_dir`; `extensions` drives the last-resort
    /// lookup when the tool does not report the final path.
    pub fn new(settings: &FetchSettings, output_dir: &Path, extensions: Vec<String>) -> Self {
        Self {
            program: settings.program.clone(),
            output_dir: output_dir.to_path_buf(),
            prefer_m4a: settings.prefer_m4a,
            extra_args: settings.extra_args.clone(),
            extensions,
        }
    }

    fn format(&self) -> &'static str {
        if self.prefer_m4a {
            "bestaudio[ext=m4a]/bestaudio[ext=mp4]/bestaudio/best"
        } else {
            "bestaudio/best"
        }
    }

    /// Arguments passed to the downloader for `query`.
    pub fn build_args(&self, query: &str) -> Vec<String> {
        let query = query.trim();
        let target = if query.contains("http") {
            query.to_string()
        } else {
            format!("ytsearch1:{query}")
        };
        let template = self.output_dir.join("%(title)s.%(ext)s");

        let mut args = vec![
            "-f".to_string(),
            self.format().to_string(),
            "--no-playlist".to_string(),
            "--restrict-filenames".to_string(),
            "-o".to_string(),
            template.to_string_lossy().into_owned(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            "--no-simulate".to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args.push(target);
        args
    }

    /// Newest audio file in the output folder; used when the tool printed
    /// nothing usable.
    fn newest_download(&self) -> Option<PathBuf> {
        audio_files(&self.output_dir, &self.extensions)
            .into_iter()
            .max_by_key(|p| {
                fs::metadata(p)
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH)
            })
    }
}

impl Fetcher for CommandFetcher {
    fn fetch(&self, query: &str) -> Result<PathBuf, FetchError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| FetchError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        tracing::info!(program = %self.program, query, "fetching");
        let output = Command::new(&self.program)
            .args(self.build_args(query))
            .output()
            .map_err(|source| FetchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Failed(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_output(&stdout) {
            Some(path) if path.is_file() => Ok(path),
            _ => {
                tracing::warn!(query, "downloader printed no usable path; using newest file");
                self.newest_download().ok_or(FetchError::NoOutput)
            }
        }
    }
}

/// The last non-empty line of the downloader's stdout, as a path.
fn parse_output(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .map(PathBuf::from)
}
