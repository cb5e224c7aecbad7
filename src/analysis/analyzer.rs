use crate::analysis::spectrum::{magnitude_bytes, BIN_COUNT, FFT_SIZE};
use crate::audio::AudioTap;

/// Smoothing weight toward the newest band sample
const BAND_SMOOTHING: f32 = 0.3;

/// Band ranges over the magnitude bins, as (start, end) half-open
const LOW_BINS: (usize, usize) = (1, 16);
const MID_BINS: (usize, usize) = (16, 64);
const HIGH_BINS: (usize, usize) = (64, BIN_COUNT);

/// One per-frame feature snapshot, all values in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalFeatures {
    /// Overall loudness (RMS of the time-domain window)
    pub rms: f32,
    /// Smoothed low-band energy
    pub low: f32,
    /// Smoothed mid-band energy
    pub mid: f32,
    /// Smoothed high-band energy
    pub high: f32,
}

/// Extracts loudness and frequency-band features from the live capture tap.
///
/// Holds no state beyond the rolling sample window and the last smoothed band
/// values; reset by re-creating the analyzer.
pub struct SignalAnalyzer {
    tap: AudioTap,
    window: Vec<f32>,
    smoothed: [f32; 3],
}

impl SignalAnalyzer {
    pub fn new(tap: AudioTap) -> Self {
        Self {
            tap,
            window: Vec::with_capacity(FFT_SIZE),
            smoothed: [0.0; 3],
        }
    }

    /// Produce the next feature snapshot. Call once per animation frame.
    pub fn snapshot(&mut self) -> SignalFeatures {
        let fresh = self.tap.drain(usize::MAX);
        if !fresh.is_empty() {
            self.window.extend_from_slice(&fresh);
            if self.window.len() > FFT_SIZE {
                self.window.drain(..self.window.len() - FFT_SIZE);
            }
        }

        let rms = root_mean_square(&self.window);

        let bins = magnitude_bytes(&self.window);
        let raw = [
            band_energy(&bins, LOW_BINS),
            band_energy(&bins, MID_BINS),
            band_energy(&bins, HIGH_BINS),
        ];
        for (smoothed, &sample) in self.smoothed.iter_mut().zip(raw.iter()) {
            *smoothed += (sample - *smoothed) * BAND_SMOOTHING;
        }

        SignalFeatures {
            rms,
            low: self.smoothed[0],
            mid: self.smoothed[1],
            high: self.smoothed[2],
        }
    }
}

/// RMS of a time-domain window, normalized to [0, 1]
fn root_mean_square(window: &[f32]) -> f32 {
    if window.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = window.iter().map(|&s| s * s).sum();
    (sum_sq / window.len() as f32).sqrt().min(1.0)
}

/// Summed byte magnitudes normalized by 255 and the bin count.
/// A degenerate empty range reads as zero energy.
fn band_energy(bins: &[u8; BIN_COUNT], (start, end): (usize, usize)) -> f32 {
    if end <= start {
        return 0.0;
    }
    let count = end - start;
    let sum: u32 = bins[start..end].iter().map(|&b| b as u32).sum();
    sum as f32 / (255.0 * count as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone_samples(freq_bin: usize, amplitude: f32, count: usize) -> Vec<f32> {
        (0..count)
            .map(|i| {
                (2.0 * std::f32::consts::PI * freq_bin as f32 * i as f32 / FFT_SIZE as f32).sin()
                    * amplitude
            })
            .collect()
    }

    #[test]
    fn test_silence_snapshot_is_zero() {
        let tap = AudioTap::new(FFT_SIZE * 2);
        let mut analyzer = SignalAnalyzer::new(tap);

        let features = analyzer.snapshot();
        assert_eq!(features, SignalFeatures::default());
    }

    #[test]
    fn test_rms_of_full_scale_square_wave() {
        let tap = AudioTap::new(FFT_SIZE * 2);
        tap.push(&vec![1.0; FFT_SIZE]);

        let mut analyzer = SignalAnalyzer::new(tap);
        let features = analyzer.snapshot();

        assert!((features.rms - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_low_tone_energizes_low_band() {
        let tap = AudioTap::new(FFT_SIZE * 2);
        tap.push(&tone_samples(4, 0.8, FFT_SIZE));

        let mut analyzer = SignalAnalyzer::new(tap);
        // Several frames let the smoothing converge toward the raw energy
        let mut features = SignalFeatures::default();
        for _ in 0..20 {
            features = analyzer.snapshot();
        }

        assert!(features.low > features.high);
    }

    #[test]
    fn test_band_smoothing_moves_fractionally() {
        let tap = AudioTap::new(FFT_SIZE * 2);
        let mut analyzer = SignalAnalyzer::new(tap.clone());

        tap.push(&tone_samples(4, 0.8, FFT_SIZE));
        let first = analyzer.snapshot();

        // The first smoothed value is exactly 0.3 of the raw sample
        let bins = magnitude_bytes(&tone_samples(4, 0.8, FFT_SIZE));
        let raw = band_energy(&bins, LOW_BINS);
        assert!((first.low - raw * BAND_SMOOTHING).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_band_is_zero() {
        let bins = [200u8; BIN_COUNT];
        assert_eq!(band_energy(&bins, (10, 10)), 0.0);
        assert_eq!(band_energy(&bins, (12, 10)), 0.0);
    }
}
