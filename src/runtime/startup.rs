use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{LoggingSettings, Settings};

/// Install the global subscriber. `RUST_LOG` wins over the configured filter;
/// output goes to stderr so stdout carries only notices.
pub fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("localstream=info"));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// The first positional argument, when present, replaces the library root.
pub fn apply_cli_args<I>(settings: &mut Settings, args: I)
where
    I: IntoIterator<Item = String>,
{
    if let Some(root) = args.into_iter().next() {
        settings.library.root = PathBuf::from(root);
    }
}
