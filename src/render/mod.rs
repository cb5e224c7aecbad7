pub mod driver;
pub mod waveform;

pub use driver::{RenderDriver, SharedWaveFrame};
pub use waveform::{PathCommand, WaveFrame, WaveformRenderer, RESOLUTION};
