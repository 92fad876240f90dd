//! Frame timing

use std::time::{Duration, Instant};

/// Frametime reported before any frame has been measured, in milliseconds
pub const DEFAULT_FRAMETIME_MS: f64 = 16.0;

/// Measures wall time between frames and paces the loop to a framerate cap
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_sample: Option<Instant>,
    frametime_ms: f64,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_sample: None,
            frametime_ms: DEFAULT_FRAMETIME_MS,
            frames: 0,
        }
    }

    /// Sample the clock at the start of a frame and return the duration of
    /// the previous frame in milliseconds. The first sample has nothing to
    /// measure against and reports [`DEFAULT_FRAMETIME_MS`].
    pub fn sample(&mut self) -> f64 {
        let now = Instant::now();
        self.frametime_ms = match self.last_sample {
            Some(last) => now.duration_since(last).as_secs_f64() * 1000.0,
            None => DEFAULT_FRAMETIME_MS,
        };
        self.last_sample = Some(now);
        self.frames += 1;
        self.frametime_ms
    }

    /// Frametime returned by the latest sample
    pub fn frametime(&self) -> f64 {
        self.frametime_ms
    }

    /// Frames sampled so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Block until `1 / framerate` seconds have passed since the latest
    /// sample. A framerate of zero never waits.
    pub fn wait(&self, framerate: u32) {
        let Some(last) = self.last_sample else {
            return;
        };
        if framerate == 0 {
            return;
        }
        let target = Duration::from_secs_f64(1.0 / f64::from(framerate));
        let elapsed = last.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_reports_default() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.sample(), DEFAULT_FRAMETIME_MS);
        assert_eq!(clock.frames(), 1);
    }

    #[test]
    fn test_wait_caps_framerate() {
        let mut clock = FrameClock::new();
        clock.sample();
        clock.wait(100);
        let frametime = clock.sample();
        assert!(frametime >= 10.0, "frame took {frametime} ms");
        assert_eq!(clock.frametime(), frametime);
    }

    #[test]
    fn test_uncapped_never_waits() {
        let mut clock = FrameClock::new();
        clock.wait(0);
        clock.sample();
        clock.wait(0);
        assert!(clock.sample() < 1000.0);
    }
}
