//! Commands accepted by the runtime, and the console syntax that produces them.

use crate::config::PlaybackSettings;

/// Everything a front end can ask of the runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    ResolveAndPlay(String),
    /// Resolve into the library without playing.
    Download(String),
    ResolveAndAddToPlaylist {
        query: String,
        playlist: String,
        also_play: bool,
    },
    StartPlaylist {
        name: String,
        shuffle: bool,
        looping: bool,
    },
    Skip,
    PauseResume,
    Stop,
    BeginSeek,
    SeekToPercent(f64),
    SetVolume(f32),
    CreatePlaylist(String),
    ListPlaylists,
    ListEntries(String),
    DeletePlaylists(Vec<String>),
    DeletePlaylistEntries { name: String, files: Vec<String> },
    Report,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command {0:?}; type `help` for a list")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0:?} is not a number")]
    Number(String),
}

pub const USAGE: &str = "\
commands:
  play <query>                       find or fetch a song and play it
  get <query>                        find or fetch a song into the library
  add <playlist> | <query>           find or fetch a song into a playlist
  addplay <playlist> | <query>       same, then play it
  start <playlist> [--shuffle|--no-shuffle] [--loop|--no-loop]
  skip                               next track in the queue
  pause                              pause or resume
  stop
  scrub                              hold progress updates until the next seek
  seek <percent>
  volume <0..1>
  create <playlist>
  list                               list playlists
  show <playlist>                    list a playlist's files
  rm-playlist <name> [| <name>...]
  rm <playlist> | <file> [| <file>...]
  status
  quit";

/// Parse one console line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str, defaults: &PlaybackSettings) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_lowercase().as_str() {
        "play" | "p" => Command::ResolveAndPlay(required(rest, "play <query>")?),
        "get" | "download" => Command::Download(required(rest, "get <query>")?),
        lower @ ("add" | "addplay") => {
            let (playlist, query) = split_pipe(rest).ok_or(ParseError::Usage("add <playlist> | <query>"))?;
            Command::ResolveAndAddToPlaylist {
                query: required(query, "add <playlist> | <query>")?,
                playlist,
                also_play: lower == "addplay",
            }
        }
        "start" => parse_start(rest, defaults)?,
        "skip" | "next" => Command::Skip,
        "pause" | "resume" => Command::PauseResume,
        "stop" => Command::Stop,
        "scrub" => Command::BeginSeek,
        "seek" => Command::SeekToPercent(number(rest, "seek <percent>")?),
        "volume" | "vol" => Command::SetVolume(number(rest, "volume <0..1>")? as f32),
        "create" | "new" => Command::CreatePlaylist(required(rest, "create <playlist>")?),
        "list" | "ls" => Command::ListPlaylists,
        "show" => Command::ListEntries(required(rest, "show <playlist>")?),
        "rm-playlist" => {
            let names = pipe_list(rest);
            if names.is_empty() {
                return Err(ParseError::Usage("rm-playlist <name> [| <name>...]"));
            }
            Command::DeletePlaylists(names)
        }
        "rm" => {
            let usage = ParseError::Usage("rm <playlist> | <file> [| <file>...]");
            let (name, files) = split_pipe(rest).ok_or(usage.clone())?;
            let files = pipe_list(files);
            if files.is_empty() {
                return Err(usage);
            }
            Command::DeletePlaylistEntries { name, files }
        }
        "status" => Command::Report,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(ParseError::Unknown(word.to_string())),
    };
    Ok(Some(cmd))
}

fn required(rest: &str, usage: &'static str) -> Result<String, ParseError> {
    let rest = rest.trim();
    if rest.is_empty() {
        Err(ParseError::Usage(usage))
    } else {
        Ok(rest.to_string())
    }
}

fn number(rest: &str, usage: &'static str) -> Result<f64, ParseError> {
    let raw = required(rest, usage)?;
    raw.parse::<f64>().map_err(|_| ParseError::Number(raw))
}

/// `"<head> | <tail>"` with a non-empty head.
fn split_pipe(rest: &str) -> Option<(String, &str)> {
    let (head, tail) = rest.split_once('|')?;
    let head = head.trim();
    (!head.is_empty()).then(|| (head.to_string(), tail))
}

fn pipe_list(rest: &str) -> Vec<String> {
    rest.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_start(rest: &str, defaults: &PlaybackSettings) -> Result<Command, ParseError> {
    const USAGE: &str = "start <playlist> [--shuffle|--no-shuffle] [--loop|--no-loop]";
    let mut shuffle = defaults.shuffle;
    let mut looping = defaults.loop_list;
    let mut name = Vec::new();

    for token in rest.split_whitespace() {
        match token {
            "--shuffle" => shuffle = true,
            "--no-shuffle" => shuffle = false,
            "--loop" => looping = true,
            "--no-loop" => looping = false,
            flag if flag.starts_with("--") => return Err(ParseError::Usage(USAGE)),
            word => name.push(word),
        }
    }
    if name.is_empty() {
        return Err(ParseError::Usage(USAGE));
    }
    Ok(Command::StartPlaylist {
        name: name.join(" "),
        shuffle,
        looping,
    })
}
