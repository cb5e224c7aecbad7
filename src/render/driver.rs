use crate::analysis::SignalAnalyzer;
use crate::render::waveform::{WaveFrame, WaveformRenderer};
use crate::utils::perf::TimingTracker;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Shared slot the UI reads the latest frame from
pub type SharedWaveFrame = Arc<Mutex<WaveFrame>>;

/// Nominal frame interval (~60 Hz)
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Drives the analyzer + renderer at ~60 Hz while a recording is live.
///
/// The driver exclusively owns the analysis graph; `stop` joins the worker
/// and drops the graph, releasing the capture tap. Stopping is idempotent
/// and is expected on every recording exit path. Pausing freezes both frame
/// production and the renderer's time offset, in lockstep with the
/// recording timer.
pub struct RenderDriver {
    active: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    frame_slot: SharedWaveFrame,
    worker: Option<JoinHandle<()>>,
}

impl RenderDriver {
    /// Spawn the frame loop over the given analysis graph
    pub fn start(mut analyzer: SignalAnalyzer, width: f32, height: f32) -> Self {
        let active = Arc::new(AtomicBool::new(true));
        let paused = Arc::new(AtomicBool::new(false));
        let frame_slot: SharedWaveFrame = Arc::new(Mutex::new(WaveFrame::default()));

        let run = Arc::clone(&active);
        let hold = Arc::clone(&paused);
        let slot = Arc::clone(&frame_slot);

        let worker = std::thread::spawn(move || {
            let mut renderer = WaveformRenderer::new(width, height);
            let mut timings = TimingTracker::new(120);
            let mut last_frame = Instant::now();

            info!("Render loop started ({}x{})", width, height);

            while run.load(Ordering::SeqCst) {
                let frame_start = Instant::now();
                let elapsed = frame_start.duration_since(last_frame);
                last_frame = frame_start;

                if !hold.load(Ordering::SeqCst) {
                    let features = analyzer.snapshot();
                    let frame =
                        renderer.render_frame(elapsed.as_secs_f32() * 1000.0, &features);
                    *slot.lock() = frame;
                    timings.record(frame_start.elapsed());
                }

                let budget = FRAME_INTERVAL.saturating_sub(frame_start.elapsed());
                if !budget.is_zero() {
                    std::thread::sleep(budget);
                }
            }

            debug!(
                "Render loop exited (avg frame {:?}, p95 {:?})",
                timings.average(),
                timings.percentile_95()
            );
        });

        Self {
            active,
            paused,
            frame_slot,
            worker: Some(worker),
        }
    }

    /// Handle the UI reads frames through
    pub fn frame_slot(&self) -> SharedWaveFrame {
        Arc::clone(&self.frame_slot)
    }

    /// Freeze or resume frame production
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Cancel the frame loop and drop the analysis graph. Idempotent.
    pub fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
            info!("Render driver stopped");
        }
    }
}

impl Drop for RenderDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
