//! Frame timing and pacing
//!
//! [`FrameTiming`] keeps a rolling history of frame durations for
//! statistics; [`FrameLimiter`] paces a loop to a target rate.

use std::time::{Duration, Instant};

/// Rolling frame time statistics
#[derive(Debug, Clone)]
pub struct FrameTiming {
    last_frame_start: Option<Instant>,
    last_frame_duration: Duration,
    frame_times: Vec<Duration>,
    history_size: usize,
    total_elapsed: Duration,
    frame_count: u64,
}

impl FrameTiming {
    pub fn new(history_size: usize) -> Self {
        Self {
            last_frame_start: None,
            last_frame_duration: Duration::ZERO,
            frame_times: Vec::with_capacity(history_size),
            history_size: history_size.max(1),
            total_elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Mark frame start
    pub fn begin_frame(&mut self) -> Instant {
        let now = Instant::now();
        self.record_frame_at(now);
        now
    }

    /// Mark a frame start at a known instant
    pub fn record_frame_at(&mut self, now: Instant) {
        if let Some(last_start) = self.last_frame_start {
            self.last_frame_duration = now.saturating_duration_since(last_start);
            self.total_elapsed += self.last_frame_duration;

            if self.frame_times.len() >= self.history_size {
                self.frame_times.remove(0);
            }
            self.frame_times.push(self.last_frame_duration);
        }

        self.last_frame_start = Some(now);
        self.frame_count += 1;
    }

    pub fn last_frame_duration(&self) -> Duration {
        self.last_frame_duration
    }

    pub fn average_frame_duration(&self) -> Duration {
        if self.frame_times.is_empty() {
            Duration::ZERO
        } else {
            let sum: Duration = self.frame_times.iter().sum();
            sum / self.frame_times.len() as u32
        }
    }

    pub fn average_fps(&self) -> f64 {
        let avg = self.average_frame_duration();
        if avg.is_zero() {
            0.0
        } else {
            1.0 / avg.as_secs_f64()
        }
    }

    /// Get frame time percentile (0-100)
    pub fn frame_time_percentile(&self, percentile: u32) -> Duration {
        if self.frame_times.is_empty() {
            return Duration::ZERO;
        }

        let mut sorted = self.frame_times.clone();
        sorted.sort();

        let idx = ((percentile.min(100) as f64 / 100.0) * (sorted.len() - 1) as f64) as usize;
        sorted[idx]
    }

    pub fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(120)
    }
}

/// Frame limiter for CPU-side frame pacing
pub struct FrameLimiter {
    target_frame_time: Duration,
    last_frame: Instant,
}

impl FrameLimiter {
    /// Create new frame limiter with target FPS; 0 means unlimited
    pub fn new(target_fps: u32) -> Self {
        let mut limiter = Self {
            target_frame_time: Duration::ZERO,
            last_frame: Instant::now(),
        };
        limiter.set_target_fps(target_fps);
        limiter
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_frame_time = if fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / fps as f64)
        };
    }

    pub fn target_frame_time(&self) -> Duration {
        self.target_frame_time
    }

    /// Sleep until the next frame is due
    pub fn wait(&mut self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.target_frame_time {
            std::thread::sleep(self.target_frame_time - elapsed);
        }
        self.last_frame = Instant::now();
    }
}
