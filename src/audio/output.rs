use crate::{Result, VoxnoteError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Playback sink for one decoded note.
///
/// The stream reads from a fixed sample buffer at a shared cursor, so the
/// controller can report progress and reposition playback (seek) while the
/// stream runs. When the buffer is exhausted the stream fills silence and
/// raises the finished flag.
pub struct AudioOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    is_playing: Arc<AtomicBool>,
}

impl AudioOutput {
    /// Create a new output bound to the default output device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host.default_output_device().ok_or_else(|| {
            VoxnoteError::AudioDeviceError("no output device available".into())
        })?;

        info!(
            "Using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_output_config()
            .map_err(|e| {
                VoxnoteError::AudioDeviceError(format!("failed to get output config: {}", e))
            })?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
            is_playing: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get the sample rate of the output device
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Start playing `samples` (mono, at `source_rate`) from the shared cursor
    pub fn start(
        &mut self,
        samples: Arc<Vec<f32>>,
        source_rate: u32,
        cursor: Arc<AtomicUsize>,
        finished: Arc<AtomicBool>,
    ) -> Result<()> {
        if self.stream.is_some() {
            warn!("Already playing");
            return Ok(());
        }

        let channels = self.config.channels as usize;
        // Nearest-neighbor rate adaptation between the note and the device
        let step = source_rate as f64 / self.config.sample_rate.0 as f64;
        let is_playing = Arc::clone(&self.is_playing);

        let err_fn = |err| {
            error!("Audio output stream error: {}", err);
        };

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !is_playing.load(Ordering::SeqCst) {
                        data.fill(0.0);
                        return;
                    }

                    // The cursor is the shared truth so a seek mid-callback
                    // takes effect at the next block boundary
                    let mut position = cursor.load(Ordering::SeqCst) as f64;

                    for frame in data.chunks_mut(channels) {
                        let index = position as usize;
                        let sample = if index < samples.len() {
                            samples[index]
                        } else {
                            finished.store(true, Ordering::SeqCst);
                            0.0
                        };

                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                        position += step;
                    }

                    cursor.store((position as usize).min(samples.len()), Ordering::SeqCst);
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                VoxnoteError::AudioDeviceError(format!("failed to build output stream: {}", e))
            })?;

        stream
            .play()
            .map_err(|e| VoxnoteError::AudioDeviceError(format!("failed to start output: {}", e)))?;

        self.is_playing.store(true, Ordering::SeqCst);
        self.stream = Some(stream);

        info!("Playback started");
        Ok(())
    }

    /// Gate playback without releasing the stream (pause/resume)
    pub fn set_playing(&self, playing: bool) {
        self.is_playing.store(playing, Ordering::SeqCst);
    }

    /// Check if audio is currently being produced
    pub fn is_playing(&self) -> bool {
        self.is_playing.load(Ordering::SeqCst)
    }

    /// Release the output stream
    pub fn stop(&mut self) {
        self.is_playing.store(false, Ordering::SeqCst);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Playback stopped");
        }
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stop();
    }
}
