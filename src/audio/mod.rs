pub mod buffer;
#[cfg(feature = "audio-io")]
pub mod input;
#[cfg(feature = "audio-io")]
pub mod output;
pub mod wav;

pub use buffer::AudioTap;
#[cfg(feature = "audio-io")]
pub use input::AudioInput;
#[cfg(feature = "audio-io")]
pub use output::AudioOutput;
pub use wav::{decode_wav, encode_wav, AudioBlob, WAV_MIME};
