//! Frame timing for the host loop.

use std::time::{Duration, Instant};

/// Reference frame rate the per-tick constants are tuned for.
pub const REFERENCE_FPS: f32 = 60.0;

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time when the clock started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Upper bound on a single delta, so a stalled window does not teleport everything.
    max_delta: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            max_delta: Duration::from_millis(250),
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let raw = now - self.last_frame;
        if raw > self.max_delta {
            log::debug!("Frame took {:?}, clamped to {:?}", raw, self.max_delta);
        }
        self.delta = raw.min(self.max_delta);
        self.last_frame = now;
        self.elapsed = now - self.start_time;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (averaged over last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}
