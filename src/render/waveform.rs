//! Audio-reactive composite waveform.
//!
//! Five fixed sine generators are composited into a single filled curve each
//! frame, with the overall loudness driving an attack/release envelope and
//! the smoothed frequency bands modulating individual generators. The output
//! is resolution-independent path geometry; rasterization belongs to the UI.

use crate::analysis::SignalFeatures;

/// Horizontal sample points across the canvas width
pub const RESOLUTION: usize = 128;

/// Baseline visual amplitude when the input is silent
const BASE_AMPLITUDE: f32 = 0.4;
/// How strongly voice energy drives the target amplitude
const ENERGY_GAIN: f32 = 3.0;
/// Envelope step when loudness rises
const ATTACK: f32 = 0.25;
/// Envelope step when loudness falls
const RELEASE: f32 = 0.15;
/// Per-frame peak decay factor
const PEAK_DECAY: f32 = 0.99;
/// Peak below this reads as silence
const PEAK_FLOOR: f32 = 1e-3;
/// Easing step of the rendered amplitude toward its target
const AMPLITUDE_EASING: f32 = 0.2;
/// Second harmonic frequency ratio and blend weight
const HARMONIC_RATIO: f32 = 1.7;
const HARMONIC_WEIGHT: f32 = 0.3;
/// Vertical scale relative to canvas half-height
const HEIGHT_SCALE: f32 = 0.35;
/// Vertical anchor of the curve, as a fraction of canvas height
const BASELINE: f32 = 0.62;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Low,
    Mid,
    High,
}

/// One fixed sine generator. All constants are hand-tuned.
struct WaveShape {
    phase: f32,
    frequency: f32,
    speed: f32,
    amplitude: f32,
    band: Band,
}

const WAVES: [WaveShape; 5] = [
    WaveShape { phase: 0.0, frequency: 8.0, speed: 0.0011, amplitude: 0.35, band: Band::Low },
    WaveShape { phase: 1.3, frequency: 11.0, speed: 0.0017, amplitude: 0.25, band: Band::Mid },
    WaveShape { phase: 2.1, frequency: 14.5, speed: 0.0023, amplitude: 0.18, band: Band::High },
    WaveShape { phase: 4.2, frequency: 5.5, speed: 0.0008, amplitude: 0.4, band: Band::Low },
    WaveShape { phase: 5.0, frequency: 9.5, speed: 0.0014, amplitude: 0.22, band: Band::Mid },
];

/// Path geometry for one rendered frame
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    QuadTo { cx: f32, cy: f32, x: f32, y: f32 },
    Close,
}

/// One frame of the composite waveform, as a closed filled path
/// anchored along the bottom edge of the canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveFrame {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<PathCommand>,
}

/// Per-frame compositor for the recording waveform.
pub struct WaveformRenderer {
    width: f32,
    height: f32,
    /// Monotonic time offset in milliseconds, advanced by real elapsed time
    time_offset: f32,
    /// Envelope-smoothed loudness
    level: f32,
    /// Decaying peak used to normalize perceived voice energy
    peak: f32,
    /// Eased render amplitude
    amplitude: f32,
}

impl WaveformRenderer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            time_offset: 0.0,
            level: 0.0,
            peak: 0.0,
            amplitude: BASE_AMPLITUDE,
        }
    }

    /// Compute the next frame. `elapsed_ms` is the real time since the
    /// previous frame, keeping the animation frame-rate independent.
    pub fn render_frame(&mut self, elapsed_ms: f32, features: &SignalFeatures) -> WaveFrame {
        self.time_offset += elapsed_ms;

        // Fast attack, slow release over the raw loudness
        let step = if features.rms > self.level { ATTACK } else { RELEASE };
        self.level += (features.rms - self.level) * step;

        // Decaying peak, clamped up to the current smoothed level
        self.peak = (self.peak * PEAK_DECAY).max(self.level);
        let energy = if self.peak > PEAK_FLOOR {
            self.level / self.peak
        } else {
            0.0
        };

        let target = BASE_AMPLITUDE + energy * ENERGY_GAIN;
        self.amplitude += (target - self.amplitude) * AMPLITUDE_EASING;

        self.build_path(features)
    }

    fn build_path(&self, features: &SignalFeatures) -> WaveFrame {
        let scale = self.amplitude * self.height * 0.5 * HEIGHT_SCALE;
        let base_y = self.height * BASELINE;

        let mut points = [(0.0f32, 0.0f32); RESOLUTION];
        for (i, point) in points.iter_mut().enumerate() {
            let x_norm = i as f32 / (RESOLUTION - 1) as f32;
            let mut offset = 0.0;

            for wave in &WAVES {
                let band_energy = match wave.band {
                    Band::Low => features.low,
                    Band::Mid => features.mid,
                    Band::High => features.high,
                };
                // Band energy swings the generator's contribution by ±50%
                let modulation = 0.5 + band_energy;

                let arg = x_norm * wave.frequency + self.time_offset * wave.speed + wave.phase;
                let harmonic = x_norm * wave.frequency * HARMONIC_RATIO
                    + self.time_offset * wave.speed
                    + wave.phase;

                offset += (arg.sin() + HARMONIC_WEIGHT * harmonic.sin())
                    * wave.amplitude
                    * modulation;
            }

            *point = (x_norm * self.width, base_y - offset * scale);
        }

        let mut commands = Vec::with_capacity(RESOLUTION + 4);
        commands.push(PathCommand::MoveTo { x: 0.0, y: self.height });
        commands.push(PathCommand::LineTo { x: points[0].0, y: points[0].1 });

        // Quadratic segments through the midpoints keep the curve smooth
        for window in points.windows(2).skip(1) {
            let (cx, cy) = window[0];
            let mx = (window[0].0 + window[1].0) * 0.5;
            let my = (window[0].1 + window[1].1) * 0.5;
            commands.push(PathCommand::QuadTo { cx, cy, x: mx, y: my });
        }

        let (last_x, last_y) = points[RESOLUTION - 1];
        commands.push(PathCommand::LineTo { x: last_x, y: last_y });
        commands.push(PathCommand::LineTo { x: self.width, y: self.height });
        commands.push(PathCommand::Close);

        WaveFrame {
            width: self.width,
            height: self.height,
            commands,
        }
    }

    /// Current eased render amplitude
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Current envelope-smoothed loudness
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Current monotonic time offset in milliseconds
    pub fn time_offset(&self) -> f32 {
        self.time_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: f32 = 16.0;

    fn loud(rms: f32) -> SignalFeatures {
        SignalFeatures { rms, low: 0.5, mid: 0.5, high: 0.5 }
    }

    #[test]
    fn test_time_offset_tracks_real_elapsed() {
        let mut renderer = WaveformRenderer::new(320.0, 80.0);
        renderer.render_frame(16.0, &loud(0.0));
        renderer.render_frame(33.0, &loud(0.0));

        assert!((renderer.time_offset() - 49.0).abs() < 1e-6);
    }

    #[test]
    fn test_attack_is_faster_than_release() {
        let mut rising = WaveformRenderer::new(320.0, 80.0);
        rising.render_frame(FRAME_MS, &loud(1.0));
        let rise = rising.level();

        let mut falling = WaveformRenderer::new(320.0, 80.0);
        // Drive the level up, then feed silence
        for _ in 0..200 {
            falling.render_frame(FRAME_MS, &loud(1.0));
        }
        let before = falling.level();
        falling.render_frame(FRAME_MS, &loud(0.0));
        let drop = before - falling.level();

        assert!((rise - ATTACK).abs() < 1e-6);
        assert!((drop - before * RELEASE).abs() < 1e-4);
        assert!(rise > drop);
    }

    #[test]
    fn test_amplitude_rises_monotonically_toward_target() {
        let mut renderer = WaveformRenderer::new(320.0, 80.0);

        let mut previous = renderer.amplitude();
        for _ in 0..60 {
            renderer.render_frame(FRAME_MS, &loud(1.0));
            assert!(renderer.amplitude() >= previous);
            previous = renderer.amplitude();
        }

        // Sustained full loudness converges toward base + gain
        assert!(renderer.amplitude() > BASE_AMPLITUDE + ENERGY_GAIN * 0.8);
    }

    #[test]
    fn test_silent_input_settles_at_base_amplitude() {
        let mut renderer = WaveformRenderer::new(320.0, 80.0);
        for _ in 0..120 {
            renderer.render_frame(FRAME_MS, &SignalFeatures::default());
        }

        assert!((renderer.amplitude() - BASE_AMPLITUDE).abs() < 1e-3);
    }

    #[test]
    fn test_frame_is_closed_bottom_anchored_path() {
        let mut renderer = WaveformRenderer::new(320.0, 80.0);
        let frame = renderer.render_frame(FRAME_MS, &loud(0.5));

        assert_eq!(frame.width, 320.0);
        assert_eq!(
            frame.commands.first(),
            Some(&PathCommand::MoveTo { x: 0.0, y: 80.0 })
        );
        assert_eq!(frame.commands.last(), Some(&PathCommand::Close));

        let quads = frame
            .commands
            .iter()
            .filter(|c| matches!(c, PathCommand::QuadTo { .. }))
            .count();
        assert_eq!(quads, RESOLUTION - 2);
    }

    #[test]
    fn test_geometry_is_finite_and_spans_the_width() {
        let mut renderer = WaveformRenderer::new(320.0, 80.0);
        for _ in 0..120 {
            let frame = renderer.render_frame(FRAME_MS, &loud(1.0));
            let mut max_x = 0.0f32;
            for command in &frame.commands {
                let (x, y) = match command {
                    PathCommand::MoveTo { x, y } => (*x, *y),
                    PathCommand::LineTo { x, y } => (*x, *y),
                    PathCommand::QuadTo { x, y, .. } => (*x, *y),
                    PathCommand::Close => continue,
                };
                assert!(x.is_finite() && y.is_finite());
                assert!((0.0..=320.0).contains(&x));
                max_x = max_x.max(x);
            }
            assert_eq!(max_x, 320.0);
        }
    }
}
