//! Frame context
//!
//! Timing information handed to every animation loop on each tick.

use std::time::Duration;

/// Timing for a single scheduler tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    /// Tick number, starting at 1
    pub frame_number: u64,
    /// Wall-clock time since the page started
    pub elapsed: Duration,
    /// Time since the previous tick
    pub delta: Duration,
}

impl FrameContext {
    pub fn new(frame_number: u64, elapsed: Duration, delta: Duration) -> Self {
        Self {
            frame_number,
            elapsed,
            delta,
        }
    }

    /// Elapsed time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Elapsed time in milliseconds, as animation frame timestamps report it
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Delta time in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
