use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, SyncSender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::sink::create_sink_at;
use super::types::{AudioCmd, EngineEvent, PlaybackHandle, PlaybackInfo};

/// How often the shared position is refreshed and the sink checked for
/// running dry.
const TICK: Duration = Duration::from_millis(100);

/// The file loaded in the sink. `offset` is where the sink started inside the
/// file, since a sink built with `skip_duration` counts from zero.
struct Loaded {
    path: PathBuf,
    generation: u64,
    sink: Sink,
    offset: Duration,
    total: Option<Duration>,
    paused: bool,
}

impl Loaded {
    fn elapsed(&self) -> Duration {
        self.offset + self.sink.get_pos()
    }
}

pub(super) fn spawn_audio_thread<T>(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    events: Sender<T>,
    ready: SyncSender<Result<(), String>>,
) -> JoinHandle<()>
where
    T: From<EngineEvent> + Send + 'static,
{
    thread::spawn(move || {
        // OutputStream is not Send, so it has to be opened on this thread.
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => {
                let _ = ready.send(Ok(()));
                stream
            }
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped.
        stream.log_on_drop(false);

        let mut current: Option<Loaded> = None;
        let mut volume = 1.0_f32;

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Play { path, generation }) => {
                    if let Some(old) = current.take() {
                        old.sink.stop();
                    }
                    match load(&stream, &path, generation, Duration::ZERO, volume, false) {
                        Ok(loaded) => {
                            tracing::debug!(path = %path.display(), total = ?loaded.total, "playing");
                            publish(&playback_info, Some(&loaded));
                            current = Some(loaded);
                        }
                        Err(message) => {
                            tracing::error!(path = %path.display(), %message, "cannot play file");
                            publish(&playback_info, None);
                            let _ = events.send(EngineEvent::Failed { path, message }.into());
                        }
                    }
                }

                Ok(AudioCmd::Pause) => {
                    if let Some(c) = current.as_mut() {
                        c.sink.pause();
                        c.paused = true;
                        publish(&playback_info, Some(&*c));
                    }
                }

                Ok(AudioCmd::Resume) => {
                    if let Some(c) = current.as_mut() {
                        c.sink.play();
                        c.paused = false;
                        publish(&playback_info, Some(&*c));
                    }
                }

                Ok(AudioCmd::Stop) => {
                    if let Some(old) = current.take() {
                        old.sink.stop();
                    }
                    publish(&playback_info, None);
                }

                Ok(AudioCmd::Seek(to)) => {
                    // Rebuild the sink and skip into the file; works for every
                    // format the decoder can read front to back.
                    let Some(old) = current.take() else {
                        continue;
                    };
                    let to = old.total.map_or(to, |total| to.min(total));
                    old.sink.stop();
                    match load(&stream, &old.path, old.generation, to, volume, old.paused) {
                        Ok(loaded) => {
                            publish(&playback_info, Some(&loaded));
                            current = Some(loaded);
                        }
                        Err(message) => {
                            tracing::error!(path = %old.path.display(), %message, "seek failed");
                            publish(&playback_info, None);
                            let _ = events.send(
                                EngineEvent::Failed {
                                    path: old.path,
                                    message,
                                }
                                .into(),
                            );
                        }
                    }
                }

                Ok(AudioCmd::SetVolume(v)) => {
                    volume = v;
                    if let Some(c) = current.as_ref() {
                        c.sink.set_volume(v);
                    }
                }

                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    if let Some(c) = current.take() {
                        if !c.paused {
                            fade_out_sink(&c.sink, volume, fade_out_ms);
                        }
                        c.sink.stop();
                    }
                    publish(&playback_info, None);
                    break;
                }

                Err(RecvTimeoutError::Timeout) => {
                    let ran_dry = current.as_ref().is_some_and(|c| !c.paused && c.sink.empty());
                    if ran_dry {
                        if let Some(done) = current.take() {
                            publish(&playback_info, None);
                            let _ = events.send(EngineEvent::Finished(done.path).into());
                        }
                    } else if let Some(c) = current.as_ref() {
                        publish(&playback_info, Some(c));
                    }
                }

                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn load(
    stream: &OutputStream,
    path: &std::path::Path,
    generation: u64,
    start_at: Duration,
    volume: f32,
    paused: bool,
) -> Result<Loaded, String> {
    let built = create_sink_at(stream, path, start_at).map_err(|e| e.to_string())?;
    built.sink.set_volume(volume);
    if !paused {
        built.sink.play();
    }
    Ok(Loaded {
        path: path.to_path_buf(),
        generation,
        sink: built.sink,
        offset: start_at,
        total: built.total,
        paused,
    })
}

fn publish(playback_info: &PlaybackHandle, loaded: Option<&Loaded>) {
    let Ok(mut info) = playback_info.lock() else {
        return;
    };
    *info = match loaded {
        Some(c) => PlaybackInfo {
            path: Some(c.path.clone()),
            elapsed: c.elapsed(),
            total: c.total,
            playing: !c.paused,
            generation: c.generation,
        },
        None => PlaybackInfo::default(),
    };
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
