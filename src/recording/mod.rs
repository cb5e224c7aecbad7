#[cfg(feature = "audio-io")]
pub mod controller;
pub mod session;
pub mod timer;

#[cfg(feature = "audio-io")]
pub use controller::RecordingController;
pub use session::RecordingState;
pub use timer::RecordingTimer;
