//! Per-note playback with enforced single ownership.
//!
//! At most one note plays at a time: starting a new note tears the previous
//! stream down first, so the "currently playing" state is an owned field
//! with explicit transitions rather than ambient global state.

use crate::audio::AudioOutput;
use crate::playback::player::{NotePlayback, PlaybackState};
use crate::store::NoteRecord;
use crate::Result;
use tracing::{info, warn};

pub struct PlaybackController {
    output: Option<AudioOutput>,
    current: Option<NotePlayback>,
    state: PlaybackState,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self {
            output: None,
            current: None,
            state: PlaybackState::Stopped,
        }
    }

    /// Start playing a note from the beginning, stopping any previous one
    pub fn play(&mut self, note: &NoteRecord) -> Result<()> {
        self.stop();

        let playback = NotePlayback::from_blob(note.id, &note.audio)?;
        let mut output = AudioOutput::new()?;
        output.start(
            playback.samples(),
            playback.sample_rate(),
            playback.cursor(),
            playback.finished(),
        )?;

        info!("Playing note {}", note.id);
        self.output = Some(output);
        self.current = Some(playback);
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Pause or resume the current note
    pub fn toggle_pause(&mut self) {
        let Some(output) = self.output.as_ref() else {
            warn!("No active playback to pause");
            return;
        };

        match self.state {
            PlaybackState::Playing => {
                output.set_playing(false);
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused => {
                output.set_playing(true);
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Stopped => {}
        }
    }

    /// Seek the current note to a fractional position
    pub fn seek(&mut self, fraction: f32) {
        if let Some(playback) = self.current.as_ref() {
            playback.seek(fraction);
        }
    }

    /// Tear down the current playback, if any. Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut output) = self.output.take() {
            output.stop();
        }
        if let Some(playback) = self.current.take() {
            info!("Stopped note {}", playback.note_id());
        }
        self.state = PlaybackState::Stopped;
    }

    /// Current playback state; a finished stream reads as Stopped
    pub fn state(&self) -> PlaybackState {
        match self.current.as_ref() {
            Some(playback) if playback.is_finished() => PlaybackState::Stopped,
            _ => self.state,
        }
    }

    /// Id of the note currently loaded, if any
    pub fn current_note(&self) -> Option<i64> {
        self.current.as_ref().map(|p| p.note_id())
    }

    /// Progress of the current note as a fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        self.current.as_ref().map(|p| p.progress()).unwrap_or(0.0)
    }

    /// Position/duration of the current note in seconds
    pub fn position(&self) -> Option<(f32, f32)> {
        self.current
            .as_ref()
            .map(|p| (p.position_secs(), p.duration_secs()))
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.stop();
    }
}
