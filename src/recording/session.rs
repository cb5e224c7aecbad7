use crate::audio::wav::{encode_wav, AudioBlob};
use crate::recording::timer::RecordingTimer;
use crate::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recording state for voice input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// Not recording
    Idle,
    /// Currently capturing audio
    Recording,
    /// Capture suspended, elapsed time frozen
    Paused,
}

/// Transient state of one live recording. Created by `start`, destroyed by
/// `stop` or cancel; never persisted.
pub(crate) struct SessionBuffers {
    /// Accumulated mono samples for the note payload
    pub samples: Arc<Mutex<Vec<f32>>>,
    pub sample_rate: u32,
    pub timer: RecordingTimer,
}

impl SessionBuffers {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            samples: Arc::new(Mutex::new(Vec::new())),
            sample_rate,
            timer: RecordingTimer::new(),
        }
    }

    /// Finalize the buffered samples into an audio payload plus the
    /// duration label captured from the timer. An empty capture yields
    /// `None` rather than an empty note.
    pub fn finalize(mut self) -> Result<Option<(AudioBlob, String)>> {
        self.timer.pause();
        let label = self.timer.label();

        let samples = std::mem::take(&mut *self.samples.lock());
        if samples.is_empty() {
            return Ok(None);
        }

        let bytes = encode_wav(&samples, self.sample_rate)?;
        Ok(Some((AudioBlob::wav(bytes), label)))
    }
}
