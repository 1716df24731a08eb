//! Frame clock used to drive cull passes and timestamp pose samples.

use std::time::{Duration, Instant};

/// Timing information for a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Zero-based frame number
    pub frame: u64,
    /// Time since the previous tick
    pub delta: Duration,
    /// Time since the clock was started
    pub elapsed: Duration,
}

impl FrameTime {
    /// Elapsed time in seconds, convenient for animating poses.
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

/// Monotonic frame clock.
///
/// Each call to [`FrameClock::tick`] advances the frame counter and reports
/// the delta since the previous tick.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_tick: Instant,
    frame: u64,
}

impl FrameClock {
    /// Create a new clock, starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame: 0,
        }
    }

    /// Number of frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Advance to the next frame.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let time = FrameTime {
            frame: self.frame,
            delta: now - self.last_tick,
            elapsed: now - self.start,
        };
        self.last_tick = now;
        self.frame += 1;
        time
    }

    /// Reset the clock and frame counter to the current time.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_tick = now;
        self.frame = 0;
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
    fn test_tick_advances_frames() {
        let mut clock = FrameClock::new();
        let first = clock.tick();
        let second = clock.tick();

        assert_eq!(first.frame, 0);
        assert_eq!(second.frame, 1);
        assert_eq!(clock.frame_count(), 2);
        assert!(second.elapsed >= first.elapsed);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.tick();
        clock.reset();
        assert_eq!(clock.frame_count(), 0);
        assert_eq!(clock.tick().frame, 0);
    }
}
