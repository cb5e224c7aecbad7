use std::time::{Duration, Instant};

/// Elapsed-time counter for one recording session.
///
/// Pausing freezes accumulation; resuming continues from the exact prior
/// elapsed value, so the reported duration is independent of how long the
/// session sat paused.
#[derive(Debug, Default)]
pub struct RecordingTimer {
    accumulated: Duration,
    started: Option<Instant>,
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or resume counting
    pub fn start(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    /// Freeze the counter, banking the elapsed time so far
    pub fn pause(&mut self) {
        if let Some(started) = self.started.take() {
            self.accumulated += started.elapsed();
        }
    }

    /// Continue counting from the banked value
    pub fn resume(&mut self) {
        self.start();
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Total recorded time, excluding paused spans
    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(started) => self.accumulated + started.elapsed(),
            None => self.accumulated,
        }
    }

    /// Render the elapsed time as mm:ss
    pub fn label(&self) -> String {
        let total_secs = self.elapsed().as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let timer = RecordingTimer::new();
        assert_eq!(timer.elapsed(), Duration::ZERO);
        assert_eq!(timer.label(), "00:00");
    }

    #[test]
    fn test_pause_preserves_elapsed() {
        let mut timer = RecordingTimer::new();
        timer.start();
        std::thread::sleep(Duration::from_millis(50));
        timer.pause();

        let banked = timer.elapsed();
        assert!(banked >= Duration::from_millis(50));

        // Paused wall time must not count
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(timer.elapsed(), banked);

        timer.resume();
        std::thread::sleep(Duration::from_millis(50));
        timer.pause();

        let total = timer.elapsed();
        assert!(total >= banked + Duration::from_millis(50));
        assert!(total < banked + Duration::from_millis(250));
    }

    #[test]
    fn test_double_start_is_noop() {
        let mut timer = RecordingTimer::new();
        timer.start();
        std::thread::sleep(Duration::from_millis(20));
        timer.start();
        assert!(timer.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_label_formats_minutes() {
        let timer = RecordingTimer {
            accumulated: Duration::from_secs(83),
            started: None,
        };
        assert_eq!(timer.label(), "01:23");
    }
}
