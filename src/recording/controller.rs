//! Microphone capture state machine.
//!
//! Owns the input stream, the analysis graph and the render driver for the
//! lifetime of one recording session, and guarantees their release on every
//! exit path: commit, cancel, and mic-acquisition failure.

use crate::analysis::{SignalAnalyzer, FFT_SIZE};
use crate::audio::{AudioInput, AudioTap};
use crate::enrich::EnrichmentHandle;
use crate::recording::session::{RecordingState, SessionBuffers};
use crate::render::{RenderDriver, SharedWaveFrame};
use crate::store::{NewNote, NoteStore};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Everything owned exclusively while a recording is live
struct LiveSession {
    input: AudioInput,
    driver: RenderDriver,
    buffers: SessionBuffers,
}

/// Drives the `Idle -> Recording <-> Paused -> Idle` capture lifecycle.
pub struct RecordingController {
    store: NoteStore,
    enrichment: EnrichmentHandle,
    canvas_width: f32,
    canvas_height: f32,
    state: RecordingState,
    session: Option<LiveSession>,
}

impl RecordingController {
    pub fn new(
        store: NoteStore,
        enrichment: EnrichmentHandle,
        canvas_width: f32,
        canvas_height: f32,
    ) -> Self {
        Self {
            store,
            enrichment,
            canvas_width,
            canvas_height,
            state: RecordingState::Idle,
            session: None,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Latest waveform geometry, while a session is live
    pub fn wave_frame(&self) -> Option<SharedWaveFrame> {
        self.session.as_ref().map(|s| s.driver.frame_slot())
    }

    /// Elapsed recording time, excluding paused spans
    pub fn elapsed(&self) -> Duration {
        self.session
            .as_ref()
            .map(|s| s.buffers.timer.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// The mm:ss label shown next to the live timer
    pub fn elapsed_label(&self) -> String {
        self.session
            .as_ref()
            .map(|s| s.buffers.timer.label())
            .unwrap_or_else(|| "00:00".to_string())
    }

    /// Begin a new recording. On microphone failure the error is surfaced
    /// and the state stays Idle.
    pub fn start(&mut self) -> Result<()> {
        if self.state != RecordingState::Idle {
            warn!("Recording already active");
            return Ok(());
        }

        let mut input = AudioInput::new()?;
        let mut buffers = SessionBuffers::new(input.sample_rate());
        let tap = AudioTap::new(FFT_SIZE * 16);

        input.start(Arc::clone(&buffers.samples), tap.clone())?;

        let driver = RenderDriver::start(
            SignalAnalyzer::new(tap),
            self.canvas_width,
            self.canvas_height,
        );
        buffers.timer.start();

        self.session = Some(LiveSession {
            input,
            driver,
            buffers,
        });
        self.state = RecordingState::Recording;
        info!("Recording started");
        Ok(())
    }

    /// Suspend capture; the timer and the renderer freeze in lockstep
    pub fn pause(&mut self) {
        if self.state != RecordingState::Recording {
            warn!("Pause ignored in state {:?}", self.state);
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.input.set_capturing(false);
            session.buffers.timer.pause();
            session.driver.set_paused(true);
        }
        self.state = RecordingState::Paused;
        info!("Recording paused");
    }

    /// Resume capture from the exact prior elapsed value
    pub fn resume(&mut self) {
        if self.state != RecordingState::Paused {
            warn!("Resume ignored in state {:?}", self.state);
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.buffers.timer.resume();
            session.driver.set_paused(false);
            session.input.set_capturing(true);
        }
        self.state = RecordingState::Recording;
        info!("Recording resumed");
    }

    /// Finalize the session. With `commit` the payload is persisted as a
    /// placeholder note and handed to the enrichment pipeline; without it
    /// the payload is discarded. The microphone, analysis graph and render
    /// loop are released on every path, and stopping while Idle is an
    /// idempotent cleanup no-op.
    pub fn stop(&mut self, commit: bool) -> Result<Option<i64>> {
        let Some(mut session) = self.session.take() else {
            self.state = RecordingState::Idle;
            return Ok(None);
        };
        self.state = RecordingState::Idle;

        session.input.stop();
        session.driver.stop();

        if !commit {
            info!("Recording cancelled");
            return Ok(None);
        }

        let Some((blob, label)) = session.buffers.finalize()? else {
            warn!("No audio captured; nothing to save");
            return Ok(None);
        };

        let id = self.store.save(NewNote::new(blob.clone(), label))?;
        if let Err(e) = self.enrichment.enqueue_note(id, blob) {
            // The note then stays at the placeholder; still playable
            error!("Failed to enqueue enrichment for note {}: {}", id, e);
        }

        info!("Recording committed as note {}", id);
        Ok(Some(id))
    }
}

impl Drop for RecordingController {
    fn drop(&mut self) {
        let _ = self.stop(false);
    }
}
