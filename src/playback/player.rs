use crate::audio::wav::{decode_wav, AudioBlob};
use crate::Result;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Audio playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No audio playing
    Stopped,
    /// Audio is playing
    Playing,
    /// Audio is paused
    Paused,
}

/// Decoded audio of one note plus the shared playback cursor.
///
/// The cursor (in source samples) is shared with the output stream, so seeks
/// reposition playback immediately and progress reads stay accurate while
/// the stream runs.
pub struct NotePlayback {
    note_id: i64,
    samples: Arc<Vec<f32>>,
    sample_rate: u32,
    cursor: Arc<AtomicUsize>,
    finished: Arc<AtomicBool>,
}

impl NotePlayback {
    /// Decode a stored audio payload for playback
    pub fn from_blob(note_id: i64, blob: &AudioBlob) -> Result<Self> {
        let (samples, sample_rate) = decode_wav(&blob.bytes)?;
        Ok(Self {
            note_id,
            samples: Arc::new(samples),
            sample_rate,
            cursor: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn note_id(&self) -> i64 {
        self.note_id
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total duration in seconds
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Current position in seconds
    pub fn position_secs(&self) -> f32 {
        self.cursor.load(Ordering::SeqCst) as f32 / self.sample_rate as f32
    }

    /// Current progress as a fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        (self.cursor.load(Ordering::SeqCst) as f32 / self.samples.len() as f32).min(1.0)
    }

    /// Jump to a fractional position; takes effect immediately
    pub fn seek(&self, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        let target = (fraction * self.samples.len() as f32) as usize;
        self.cursor.store(target.min(self.samples.len()), Ordering::SeqCst);
        self.finished.store(false, Ordering::SeqCst);
    }

    /// Whether the stream exhausted the samples
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub(crate) fn samples(&self) -> Arc<Vec<f32>> {
        Arc::clone(&self.samples)
    }

    pub(crate) fn cursor(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.cursor)
    }

    pub(crate) fn finished(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::wav::encode_wav;

    fn playback(duration_secs: f32) -> NotePlayback {
        let rate = 16000u32;
        let count = (duration_secs * rate as f32) as usize;
        let samples: Vec<f32> = (0..count)
            .map(|i| (i as f32 * 0.05).sin() * 0.4)
            .collect();
        let blob = AudioBlob::wav(encode_wav(&samples, rate).unwrap());
        NotePlayback::from_blob(7, &blob).unwrap()
    }

    #[test]
    fn test_duration_matches_decoded_audio() {
        let playback = playback(2.0);
        assert!((playback.duration_secs() - 2.0).abs() < 0.01);
        assert_eq!(playback.note_id(), 7);
    }

    #[test]
    fn test_seek_sets_position_and_progress() {
        let playback = playback(4.0);

        playback.seek(0.5);
        assert!((playback.progress() - 0.5).abs() < 1e-3);
        assert!((playback.position_secs() - 2.0).abs() < 0.01);

        playback.seek(0.25);
        assert!((playback.progress() - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_seek_clamps_out_of_range() {
        let playback = playback(1.0);

        playback.seek(1.7);
        assert!((playback.progress() - 1.0).abs() < 1e-3);

        playback.seek(-0.3);
        assert_eq!(playback.progress(), 0.0);
    }

    #[test]
    fn test_seek_clears_finished() {
        let playback = playback(1.0);
        playback.finished().store(true, Ordering::SeqCst);

        playback.seek(0.0);
        assert!(!playback.is_finished());
    }
}
