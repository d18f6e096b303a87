use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_explicit_variable() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("LOCALSTREAM_CONFIG_PATH", "/tmp/localstream-test.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/localstream-test.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("localstream")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("localstream")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_reference_behavior() {
    let s = Settings::default();
    assert_eq!(s.sync.poll_interval_ms, 200);
    assert_eq!(s.sync.end_threshold_secs, 0.8);
    assert!(s.playback.loop_list);
    assert!(!s.playback.shuffle);
    assert_eq!(s.library.playlists_dir, "playlists");
    assert!(s.validate().is_ok());
}

#[test]
fn playlist_extensions_exclude_lossless_but_library_includes_them() {
    let lib = LibrarySettings::default();
    let playlist = lib.playlist_extensions();
    assert!(playlist.contains(&"m4a".to_string()));
    assert!(!playlist.contains(&"flac".to_string()));

    let all = lib.all_extensions();
    assert!(all.contains(&"flac".to_string()));
    assert!(all.contains(&"wav".to_string()));
    assert!(all.contains(&"opus".to_string()));
}

#[test]
fn extensions_are_normalized() {
    let lib = LibrarySettings {
        extensions: vec![".MP3".into(), "  ".into(), "Ogg".into()],
        library_extensions: vec!["mp3".into()],
        ..LibrarySettings::default()
    };
    assert_eq!(lib.all_extensions(), vec!["mp3".to_string(), "ogg".to_string()]);
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.sync.poll_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.sync.end_threshold_secs = -1.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.volume = 1.5;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
root = "/srv/music"
playlists_dir = "lists"
extensions = ["mp3"]

[playback]
shuffle = true
loop_list = false
volume = 0.5
quit_fade_out_ms = 0

[sync]
poll_interval_ms = 100
end_threshold_secs = 1.5

[fetch]
program = "/opt/bin/yt-dlp"
prefer_m4a = false
extra_args = ["--cookies", "c.txt"]

[logging]
filter = "localstream=debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LOCALSTREAM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("LOCALSTREAM__SYNC__POLL_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.root, std::path::PathBuf::from("/srv/music"));
    assert_eq!(s.library.playlists_dir, "lists");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(s.playback.shuffle);
    assert!(!s.playback.loop_list);
    assert_eq!(s.playback.volume, 0.5);
    assert_eq!(s.playback.quit_fade_out_ms, 0);
    assert_eq!(s.sync.poll_interval_ms, 100);
    assert_eq!(s.sync.end_threshold_secs, 1.5);
    assert_eq!(s.fetch.program, "/opt/bin/yt-dlp");
    assert!(!s.fetch.prefer_m4a);
    assert_eq!(s.fetch.extra_args.len(), 2);
    assert_eq!(s.logging.filter, "localstream=debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[sync]
poll_interval_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LOCALSTREAM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("LOCALSTREAM__SYNC__POLL_INTERVAL_MS", "50");

    let s = Settings::load().unwrap();
    assert_eq!(s.sync.poll_interval_ms, 50);
}
