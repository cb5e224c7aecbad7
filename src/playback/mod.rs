#[cfg(feature = "audio-io")]
pub mod controller;
pub mod player;

#[cfg(feature = "audio-io")]
pub use controller::PlaybackController;
pub use player::{NotePlayback, PlaybackState};
