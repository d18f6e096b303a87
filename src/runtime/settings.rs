use crate::config::Settings;
use crate::error::Result;

/// Load and validate settings, falling back to defaults.
///
/// Logging is configured from these settings, so a problem is handed back
/// as a message for the caller to log once the subscriber exists.
pub fn load_settings() -> (Settings, Option<String>) {
    match try_load() {
        Ok(settings) => (settings, None),
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (Settings::default(), Some(format!("{e}; using defaults"))),
    }
}

fn try_load() -> Result<Settings> {
    let settings = Settings::load()?;
    settings.validate()?;
    Ok(settings)
}
