//! Frame clock supplied by the host loop

use std::time::Duration;

/// Time tracking for the frame loop.
///
/// The clock never reads the wall clock: the host advances it by the step it
/// simulated, so runs are reproducible.
#[derive(Debug, Clone, Default)]
pub struct Time {
    delta: Duration,
    elapsed: Duration,
    frame: u64,
}

impl Time {
    /// Create a clock at frame 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame lasting `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame += 1;
    }

    /// Duration of the current frame
    #[must_use]
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Duration of the current frame in seconds
    #[must_use]
    #[inline]
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total simulated time
    #[must_use]
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total simulated time in seconds
    #[must_use]
    #[inline]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Number of frames advanced so far
    #[must_use]
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut time = Time::new();

        time.advance(Duration::from_millis(250));
        time.advance(Duration::from_millis(250));

        assert_eq!(time.frame(), 2);
        assert_eq!(time.delta(), Duration::from_millis(250));
        assert_eq!(time.elapsed(), Duration::from_millis(500));
        assert!((time.elapsed_seconds() - 0.5).abs() < f32::EPSILON);
    }
}
