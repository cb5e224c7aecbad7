//! Magnitude spectrum for the live analyzer.
//!
//! A fixed 256-point radix-2 FFT over a Hann-windowed sample block, with bin
//! magnitudes mapped onto a 0-255 byte scale over a fixed decibel range. Band
//! energies are then sums of byte magnitudes normalized by 255 and the bin
//! count, which keeps the analyzer output in [0, 1] regardless of gain.

/// Transform size of the analysis window
pub const FFT_SIZE: usize = 256;

/// Number of usable magnitude bins (positive frequencies)
pub const BIN_COUNT: usize = FFT_SIZE / 2;

/// Decibel range mapped onto the byte scale
const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;

/// Compute byte-scaled magnitude bins for the latest sample window.
///
/// The window is zero-padded (or truncated to its tail) to `FFT_SIZE`
/// samples. Each bin magnitude is converted to decibels and mapped from
/// [`MIN_DB`, `MAX_DB`] onto 0..=255, saturating at the ends.
pub fn magnitude_bytes(window: &[f32]) -> [u8; BIN_COUNT] {
    let mut re = [0.0f32; FFT_SIZE];
    let mut im = [0.0f32; FFT_SIZE];

    let tail = if window.len() > FFT_SIZE {
        &window[window.len() - FFT_SIZE..]
    } else {
        window
    };

    for (i, &sample) in tail.iter().enumerate() {
        re[i] = sample * hann(i, FFT_SIZE);
    }

    fft_in_place(&mut re, &mut im);

    let mut bins = [0u8; BIN_COUNT];
    let scale = 2.0 / FFT_SIZE as f32;

    for (k, bin) in bins.iter_mut().enumerate() {
        let magnitude = (re[k] * re[k] + im[k] * im[k]).sqrt() * scale;
        let db = 20.0 * (magnitude.max(1e-10)).log10();
        let normalized = (db - MIN_DB) / (MAX_DB - MIN_DB);
        *bin = (normalized.clamp(0.0, 1.0) * 255.0) as u8;
    }

    bins
}

#[inline]
fn hann(i: usize, n: usize) -> f32 {
    let x = std::f32::consts::PI * i as f32 / (n - 1) as f32;
    x.sin() * x.sin()
}

/// Iterative in-place radix-2 FFT. Lengths must be `FFT_SIZE` (a power of two).
fn fft_in_place(re: &mut [f32], im: &mut [f32]) {
    let n = re.len();
    debug_assert!(n.is_power_of_two());
    debug_assert_eq!(n, im.len());

    // Bit-reversal permutation
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= n {
        let angle = -2.0 * std::f32::consts::PI / len as f32;
        let (w_im, w_re) = angle.sin_cos();

        let mut start = 0;
        while start < n {
            let mut cur_re = 1.0f32;
            let mut cur_im = 0.0f32;

            for k in 0..len / 2 {
                let a = start + k;
                let b = start + k + len / 2;

                let t_re = re[b] * cur_re - im[b] * cur_im;
                let t_im = re[b] * cur_im + im[b] * cur_re;

                re[b] = re[a] - t_re;
                im[b] = im[a] - t_im;
                re[a] += t_re;
                im[a] += t_im;

                let next_re = cur_re * w_re - cur_im * w_im;
                cur_im = cur_re * w_im + cur_im * w_re;
                cur_re = next_re;
            }
            start += len;
        }
        len <<= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(bin: usize, amplitude: f32) -> Vec<f32> {
        (0..FFT_SIZE)
            .map(|i| {
                (2.0 * std::f32::consts::PI * bin as f32 * i as f32 / FFT_SIZE as f32).sin()
                    * amplitude
            })
            .collect()
    }

    #[test]
    fn test_pure_tone_peaks_at_its_bin() {
        // Quiet enough that the byte scale does not saturate around the peak
        let bins = magnitude_bytes(&tone(16, 0.05));

        let peak = bins
            .iter()
            .enumerate()
            .max_by_key(|(_, &b)| b)
            .map(|(k, _)| k)
            .unwrap();

        assert_eq!(peak, 16);
    }

    #[test]
    fn test_silence_is_floor() {
        let bins = magnitude_bytes(&vec![0.0; FFT_SIZE]);
        assert!(bins.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_louder_tone_scores_higher() {
        let quiet = magnitude_bytes(&tone(16, 0.01));
        let loud = magnitude_bytes(&tone(16, 0.8));
        assert!(loud[16] > quiet[16]);
    }

    #[test]
    fn test_short_window_is_padded() {
        let bins = magnitude_bytes(&tone(16, 0.8)[..100]);
        assert!(bins.iter().any(|&b| b > 0));
    }
}
