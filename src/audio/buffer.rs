use parking_lot::Mutex;
use ringbuf::{traits::*, HeapRb};
use std::sync::Arc;

/// Thread-safe sample tap between the capture callback and the analyzer.
///
/// The capture side pushes raw mono samples, the analyzer drains whatever has
/// accumulated since its last frame. When full, the oldest samples are dropped
/// so the tap always holds the most recent audio.
pub struct AudioTap {
    buffer: Arc<Mutex<HeapRb<f32>>>,
}

impl AudioTap {
    /// Create a new tap with the specified capacity in samples
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(HeapRb::new(capacity))),
        }
    }

    /// Push samples, overwriting the oldest when the tap is full
    pub fn push(&self, samples: &[f32]) {
        let mut buffer = self.buffer.lock();
        for &sample in samples {
            if buffer.try_push(sample).is_err() {
                let _ = buffer.try_pop();
                let _ = buffer.try_push(sample);
            }
        }
    }

    /// Drain up to `max` samples in arrival order
    pub fn drain(&self, max: usize) -> Vec<f32> {
        let mut buffer = self.buffer.lock();
        let count = buffer.occupied_len().min(max);
        let mut samples = Vec::with_capacity(count);

        for _ in 0..count {
            match buffer.try_pop() {
                Some(sample) => samples.push(sample),
                None => break,
            }
        }

        samples
    }

    /// Get the number of samples waiting to be drained
    pub fn len(&self) -> usize {
        self.buffer.lock().occupied_len()
    }

    /// Check if the tap is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Discard all buffered samples
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }

    /// Get the capacity of the tap
    pub fn capacity(&self) -> usize {
        self.buffer.lock().capacity().get()
    }
}

impl Clone for AudioTap {
    fn clone(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_drain() {
        let tap = AudioTap::new(1024);
        let data: Vec<f32> = (0..100).map(|i| i as f32).collect();

        tap.push(&data);
        assert_eq!(tap.len(), 100);

        let drained = tap.drain(100);
        assert_eq!(drained, data);
        assert!(tap.is_empty());
    }

    #[test]
    fn test_overflow_keeps_newest() {
        let tap = AudioTap::new(10);
        let data: Vec<f32> = (0..20).map(|i| i as f32).collect();

        tap.push(&data);
        let drained = tap.drain(usize::MAX);

        assert_eq!(drained.len(), 10);
        assert_eq!(drained[0], 10.0);
        assert_eq!(drained[9], 19.0);
    }

    #[test]
    fn test_shared_between_clones() {
        let tap = AudioTap::new(64);
        let writer = tap.clone();

        writer.push(&[0.5, -0.5]);
        assert_eq!(tap.drain(usize::MAX), vec![0.5, -0.5]);
    }
}
