//! Plain-text front end: commands from stdin, notices to stdout.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::app::Notice;
use crate::config::PlaybackSettings;

use super::commands::{Command, parse_line};
use super::event_loop::Event;

/// Read commands until EOF or `quit`. EOF counts as `quit`.
pub(super) fn spawn_reader(events: Sender<Event>, defaults: PlaybackSettings) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read stdin");
                    break;
                }
            };
            match parse_line(&line, &defaults) {
                Ok(Some(cmd)) => {
                    let quit = cmd == Command::Quit;
                    if events.send(Event::Command(cmd)).is_err() || quit {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    if events.send(Event::Rejected(e.to_string())).is_err() {
                        return;
                    }
                }
            }
        }
        let _ = events.send(Event::Command(Command::Quit));
    })
}

/// Print notices until every sender is gone.
pub(super) fn spawn_printer(notices: Receiver<Notice>) -> JoinHandle<()> {
    thread::spawn(move || {
        for notice in notices {
            let mut out = io::stdout().lock();
            if writeln!(out, "{notice}").and_then(|()| out.flush()).is_err() {
                break;
            }
        }
    })
}
