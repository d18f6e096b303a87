use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::app::{Controller, Notice};
use crate::audio::{EngineEvent, PlaybackEngine};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::library::{PlaylistLibrary, Track, sanitize_name};
use crate::resolver::{Scope, TrackResolver, normalize};

use super::commands::{Command, USAGE};
use super::workers;

/// Everything the owner thread reacts to, on one channel.
#[derive(Debug)]
pub enum Event {
    Command(Command),
    /// A console line that did not parse.
    Rejected(String),
    Resolved { request: Request, result: Result<Track> },
    Removed { label: String, result: Result<usize> },
    Engine(EngineEvent),
}

impl From<EngineEvent> for Event {
    fn from(event: EngineEvent) -> Self {
        Event::Engine(event)
    }
}

/// What to do with a track once it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Play,
    Download,
    AddToPlaylist { also_play: bool },
}

#[derive(Debug, Clone)]
pub struct Request {
    pub query: String,
    pub scope: Scope,
    pub intent: Intent,
}

impl Request {
    /// Requests with equal keys would fetch the same thing into the same place.
    fn key(&self) -> (Scope, String) {
        (self.scope.clone(), normalize(&self.query))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The owner thread's state: the controller plus bookkeeping for
/// background work.
pub struct Runtime<E> {
    controller: Controller<E>,
    resolver: Arc<TrackResolver>,
    library: PlaylistLibrary,
    events: Sender<Event>,
    notices: Sender<Notice>,
    in_flight: HashSet<(Scope, String)>,
    poll_interval: Duration,
}

impl<E: PlaybackEngine> Runtime<E> {
    pub fn new(
        controller: Controller<E>,
        resolver: Arc<TrackResolver>,
        library: PlaylistLibrary,
        settings: &Settings,
        events: Sender<Event>,
        notices: Sender<Notice>,
    ) -> Self {
        Self {
            controller,
            resolver,
            library,
            events,
            notices,
            in_flight: HashSet::new(),
            poll_interval: Duration::from_millis(settings.sync.poll_interval_ms.max(1)),
        }
    }

    #[cfg(test)]
    pub fn controller(&self) -> &Controller<E> {
        &self.controller
    }

    fn notify(&self, notice: Notice) {
        let _ = self.notices.send(notice);
    }

    fn report_error(&self, err: &Error) {
        tracing::error!(error = %err, "request failed");
        self.notify(Notice::Error(err.to_string()));
    }

    /// Handle events until `Quit`, polling the engine on a fixed schedule.
    pub fn run(&mut self, rx: Receiver<Event>) {
        let mut next_tick = Instant::now() + self.poll_interval;
        loop {
            let wait = next_tick.saturating_duration_since(Instant::now());
            match rx.recv_timeout(wait) {
                Ok(event) => {
                    if self.handle(event) == Flow::Quit {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            let now = Instant::now();
            if now >= next_tick {
                self.controller.tick();
                next_tick += self.poll_interval;
                // Skip missed ticks rather than bursting to catch up.
                if next_tick <= now {
                    next_tick = now + self.poll_interval;
                }
            }
        }
        tracing::info!("shutting down");
        self.controller.shutdown();
    }

    pub fn handle(&mut self, event: Event) -> Flow {
        match event {
            Event::Command(cmd) => return self.dispatch(cmd),
            Event::Rejected(message) => self.notify(Notice::Error(message)),
            Event::Resolved { request, result } => self.on_resolved(request, result),
            Event::Removed { label, result } => match result {
                Ok(count) => self.notify(Notice::Removed { what: label, count }),
                Err(e) => self.report_error(&e),
            },
            Event::Engine(EngineEvent::Finished(path)) => self.controller.on_engine_finished(&path),
            Event::Engine(EngineEvent::Failed { path, message }) => {
                tracing::error!(path = %path.display(), %message, "engine failure");
                self.controller.on_engine_failed(&path, &message);
            }
        }
        Flow::Continue
    }

    pub fn dispatch(&mut self, cmd: Command) -> Flow {
        tracing::debug!(?cmd, "command");
        match cmd {
            Command::ResolveAndPlay(query) => self.request(query, Scope::Library, Intent::Play),
            Command::Download(query) => self.request(query, Scope::Library, Intent::Download),
            Command::ResolveAndAddToPlaylist {
                query,
                playlist,
                also_play,
            } => {
                let name = sanitize_name(&playlist);
                if name.is_empty() {
                    self.report_error(&Error::InvalidName(playlist));
                } else {
                    self.request(query, Scope::Playlist(name), Intent::AddToPlaylist { also_play });
                }
            }
            Command::StartPlaylist {
                name,
                shuffle,
                looping,
            } => {
                let started = self
                    .library
                    .member_dir(&sanitize_name(&name))
                    .and_then(|dir| self.controller.load_queue(&dir, shuffle, looping));
                if let Err(e) = started {
                    self.report_error(&e);
                }
            }
            Command::Skip => self.controller.skip(),
            Command::PauseResume => self.controller.pause_resume(),
            Command::Stop => self.controller.stop(),
            Command::BeginSeek => self.controller.begin_seek(),
            Command::SeekToPercent(percent) => self.controller.seek_to_percent(percent),
            Command::SetVolume(volume) => self.controller.set_volume(volume),
            Command::CreatePlaylist(name) => match self.library.create(&name) {
                Ok(name) => self.notify(Notice::PlaylistCreated(name)),
                Err(e) => self.report_error(&e),
            },
            Command::ListPlaylists => match self.library.list() {
                Ok(names) => self.notify(Notice::Playlists(names)),
                Err(e) => self.report_error(&e),
            },
            Command::ListEntries(name) => match self.library.entries(&name) {
                Ok(files) => self.notify(Notice::Entries {
                    playlist: name,
                    files,
                }),
                Err(e) => self.report_error(&e),
            },
            Command::DeletePlaylists(names) => {
                let targets = self.library.playlist_dirs(&names);
                self.remove("playlists".to_string(), targets);
            }
            Command::DeletePlaylistEntries { name, files } => {
                match self.library.entry_paths(&name, &files) {
                    Ok(targets) => self.remove(name, targets),
                    Err(e) => self.report_error(&e),
                }
            }
            Command::Report => self.controller.report(),
            Command::Help => self.notify(Notice::Help(USAGE)),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn request(&mut self, query: String, scope: Scope, intent: Intent) {
        let request = Request {
            query: query.trim().to_string(),
            scope,
            intent,
        };
        if !self.in_flight.insert(request.key()) {
            tracing::info!(query = %request.query, scope = %request.scope, "already resolving");
            self.notify(Notice::AlreadyResolving(request.query));
            return;
        }
        self.notify(Notice::Searching(request.query.clone()));
        workers::spawn_resolve(self.resolver.clone(), request, self.events.clone());
    }

    fn on_resolved(&mut self, request: Request, result: Result<Track>) {
        self.in_flight.remove(&request.key());
        let track = match result {
            Ok(track) => track,
            Err(e) => return self.report_error(&e),
        };

        match (request.intent, &request.scope) {
            (Intent::Play, _) => self.controller.play_single(track),
            (Intent::Download, _) => self.notify(Notice::Downloaded(track.name)),
            (Intent::AddToPlaylist { also_play }, scope) => {
                let playlist = match scope {
                    Scope::Playlist(name) => name.clone(),
                    Scope::Library => "library".to_string(),
                };
                self.notify(Notice::Added {
                    playlist,
                    name: track.name.clone(),
                });
                if also_play {
                    self.controller.play_single(track);
                }
            }
        }
    }

    /// Stop using the targets on this thread, then delete them on a worker.
    fn remove(&mut self, label: String, targets: Vec<PathBuf>) {
        self.controller.forget(&targets);
        workers::spawn_removal(label, targets, self.events.clone());
    }
}
