//! Background jobs. Each runs on its own thread and reports back through the
//! runtime channel; none of them touch the controller.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::library::remove_paths;
use crate::resolver::TrackResolver;

use super::event_loop::{Event, Request};

pub(super) fn spawn_resolve(resolver: Arc<TrackResolver>, request: Request, events: Sender<Event>) {
    thread::spawn(move || {
        let result = resolver.resolve(&request.query, &request.scope);
        let _ = events.send(Event::Resolved { request, result });
    });
}

pub(super) fn spawn_removal(label: String, targets: Vec<PathBuf>, events: Sender<Event>) {
    thread::spawn(move || {
        let result = remove_paths(&targets);
        let _ = events.send(Event::Removed { label, result });
    });
}
