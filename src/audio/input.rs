use crate::audio::AudioTap;
use crate::{Result, VoxnoteError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Microphone capture for one recording session.
///
/// Samples are downmixed to mono and fanned out to the session buffer (the
/// note payload) and the analyzer tap (the live visualization window). The
/// capture gate lets pause stop accumulation without tearing the stream down;
/// dropping the handle releases the hardware stream.
pub struct AudioInput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    is_capturing: Arc<AtomicBool>,
}

impl AudioInput {
    /// Create a new input bound to the default input device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host.default_input_device().ok_or_else(|| {
            VoxnoteError::PermissionDenied("no input device available".into())
        })?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| {
                VoxnoteError::AudioDeviceError(format!("failed to get input config: {}", e))
            })?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
            is_capturing: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get the sample rate of the input device
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Get the number of channels
    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    /// Start capturing into the session buffer and the analyzer tap
    pub fn start(&mut self, session_buffer: Arc<Mutex<Vec<f32>>>, tap: AudioTap) -> Result<()> {
        if self.stream.is_some() {
            warn!("Already capturing");
            return Ok(());
        }

        let channels = self.config.channels as usize;
        let is_capturing = Arc::clone(&self.is_capturing);

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !is_capturing.load(Ordering::SeqCst) {
                        return;
                    }

                    let mono: Vec<f32> = if channels == 1 {
                        data.to_vec()
                    } else {
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect()
                    };

                    session_buffer.lock().extend_from_slice(&mono);
                    tap.push(&mono);
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                VoxnoteError::PermissionDenied(format!("failed to open microphone: {}", e))
            })?;

        stream
            .play()
            .map_err(|e| VoxnoteError::AudioDeviceError(format!("failed to start input: {}", e)))?;

        self.is_capturing.store(true, Ordering::SeqCst);
        self.stream = Some(stream);

        info!("Microphone capture started");
        Ok(())
    }

    /// Gate sample accumulation without tearing down the stream
    pub fn set_capturing(&self, capturing: bool) {
        self.is_capturing.store(capturing, Ordering::SeqCst);
    }

    /// Check if samples are currently being accumulated
    pub fn is_capturing(&self) -> bool {
        self.is_capturing.load(Ordering::SeqCst)
    }

    /// Release the hardware stream
    pub fn stop(&mut self) {
        self.is_capturing.store(false, Ordering::SeqCst);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Microphone capture stopped");
        }
    }
}

impl Drop for AudioInput {
    fn drop(&mut self) {
        self.stop();
    }
}
