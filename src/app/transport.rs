//! Position arithmetic for the progress display and end-of-track detection.

use std::fmt;

/// Clamp an engine reading to a usable number of seconds.
///
/// Negative, NaN and infinite values all read as `0.0`.
pub fn normalize_seconds(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 { secs } else { 0.0 }
}

/// `m:ss`, with `0:00` for anything non-positive or infinite.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0:00".to_string();
    }
    let whole = secs as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// True once `current` is within `threshold` seconds of a known `total`.
pub fn reached_end(current: f64, total: f64, threshold: f64) -> bool {
    total > 0.0 && total - current <= threshold
}

/// What the progress display shows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Progress {
    pub elapsed: f64,
    pub total: f64,
    /// Position as a fraction of `total`, in `0.0..=1.0`.
    pub fraction: f64,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        self.fraction * 100.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} ({:.0}%)",
            format_time(self.elapsed),
            format_time(self.total),
            self.percent()
        )
    }
}
