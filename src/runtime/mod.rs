use std::env;
use std::fs;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crate::app::{Controller, Notice};
use crate::audio::AudioPlayer;
use crate::fetch::CommandFetcher;
use crate::library::PlaylistLibrary;
use crate::resolver::TrackResolver;

mod commands;
mod console;
mod event_loop;
mod settings;
mod startup;
mod workers;

use event_loop::{Event, Runtime};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (mut settings, warning) = settings::load_settings();
    startup::init_logging(&settings.logging);
    if let Some(warning) = warning {
        tracing::warn!("invalid config: {warning}");
    }
    startup::apply_cli_args(&mut settings, env::args().skip(1));

    let library = PlaylistLibrary::new(&settings.library)?;
    fs::create_dir_all(library.root())?;
    tracing::info!(root = %library.root().display(), "library ready");

    let fetcher = CommandFetcher::new(
        &settings.fetch,
        library.root(),
        settings.library.playlist_extensions(),
    );
    let resolver = Arc::new(TrackResolver::new(library.clone(), Box::new(fetcher)));

    let (events_tx, events_rx) = mpsc::channel::<Event>();
    let (notices_tx, notices_rx) = mpsc::channel::<Notice>();

    let engine = AudioPlayer::spawn(
        events_tx.clone(),
        Duration::from_millis(settings.playback.quit_fade_out_ms),
    )?;
    let controller = Controller::new(engine, &settings, notices_tx.clone());

    let printer = console::spawn_printer(notices_rx);
    // Blocks on stdin; left to die with the process.
    console::spawn_reader(events_tx.clone(), settings.playback.clone());

    let mut runtime = Runtime::new(controller, resolver, library, &settings, events_tx, notices_tx);
    runtime.run(events_rx);

    // Dropping the runtime closes the notice channel so the printer drains and exits.
    drop(runtime);
    let _ = printer.join();
    Ok(())
}
