//! Playback state owned by the runtime thread.
//!
//! `PlayQueue` is the ordered track list and its cursor, `PlaybackSession`
//! the transport state, and [`Controller`] ties both to a
//! [`crate::audio::PlaybackEngine`] and publishes [`Notice`]s.

mod controller;
mod model;
mod notice;
mod queue;
mod transport;

pub use controller::Controller;
pub use model::TransportState;
pub use notice::Notice;
