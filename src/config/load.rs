use std::{env, path::PathBuf};

use crate::error::{Error, Result};

use super::schema::Settings;

const ENV_PREFIX: &str = "LOCALSTREAM";
const CONFIG_PATH_VAR: &str = "LOCALSTREAM_CONFIG_PATH";

impl Settings {
    /// Layer struct defaults, the optional config file and `LOCALSTREAM__*`
    /// environment variables, in increasing order of precedence.
    pub fn load() -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = resolve_config_path() {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        let cfg = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// Reject values the controller and the poll loop cannot work with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::Config(msg.to_string()));

        if self.sync.poll_interval_ms == 0 {
            return invalid("sync.poll_interval_ms must be >= 1");
        }
        let threshold = self.sync.end_threshold_secs;
        if threshold.is_nan() || threshold < 0.0 {
            return invalid("sync.end_threshold_secs must be >= 0");
        }
        if !(0.0..=1.0).contains(&self.playback.volume) {
            return invalid("playback.volume must be within 0.0..=1.0");
        }
        if self.library.playlists_dir.trim().is_empty() {
            return invalid("library.playlists_dir must not be empty");
        }
        Ok(())
    }
}

/// `LOCALSTREAM_CONFIG_PATH` when set, else the XDG location.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/localstream/config.toml`, falling back to
/// `~/.config/localstream/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|d| d.join("localstream").join("config.toml"))
}
