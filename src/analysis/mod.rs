pub mod analyzer;
pub mod spectrum;

pub use analyzer::{SignalAnalyzer, SignalFeatures};
pub use spectrum::{magnitude_bytes, BIN_COUNT, FFT_SIZE};
