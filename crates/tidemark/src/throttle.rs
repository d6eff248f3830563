//! Frame-rate limiter for region repaints.
//!
//! Mutations can arrive far faster than a terminal can usefully repaint
//! (streaming output easily produces hundreds of updates per second).
//! The throttle enforces a minimum interval between frames; blocked repaints
//! coalesce into the next allowed one.

use std::time::{Duration, Instant};

/// Default target frame rate in frames per second.
const DEFAULT_FPS: u32 = 30;

/// Monotonic-time rate limiter for frame emission.
#[derive(Clone, Debug)]
pub struct Throttle {
    /// Minimum duration between consecutive frames.
    min_interval: Duration,
    /// When the last frame was emitted.
    last_frame: Instant,
}

impl Throttle {
    /// Create a throttle targeting `fps` frames per second.
    ///
    /// `fps` is clamped to `1..=240`.
    pub fn new(fps: u32) -> Self {
        Self {
            min_interval: interval_for(fps),
            // Far enough in the past that the first frame is always allowed.
            last_frame: Instant::now() - Duration::from_secs(1),
        }
    }

    /// Create a 30 FPS throttle, the default for interactive regions.
    pub fn default_fps() -> Self {
        Self::new(DEFAULT_FPS)
    }

    /// Gate a frame: returns `true` when the interval has elapsed, and in
    /// that case records now as the last frame time.
    ///
    /// Within one interval this returns `true` at most once.
    pub fn should_render_now(&mut self) -> bool {
        if self.last_frame.elapsed() >= self.min_interval {
            self.last_frame = Instant::now();
            true
        } else {
            false
        }
    }

    /// Time remaining until the next frame is allowed.
    ///
    /// [`Duration::ZERO`] when a frame is already permitted.
    pub fn time_until_next_frame(&self) -> Duration {
        self.min_interval.saturating_sub(self.last_frame.elapsed())
    }

    /// Record that a frame was just emitted outside the gate (e.g. a forced
    /// flush), restarting the interval.
    pub fn mark_rendered(&mut self) {
        self.last_frame = Instant::now();
    }

    /// Change the target frame rate (clamped to `1..=240`).
    pub fn set_fps(&mut self, fps: u32) {
        self.min_interval = interval_for(fps);
    }

    /// Forget the last frame time, so the next frame is allowed immediately.
    pub fn reset(&mut self) {
        self.last_frame = Instant::now() - Duration::from_secs(1);
    }

    /// The configured minimum interval between frames.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::default_fps()
    }
}

fn interval_for(fps: u32) -> Duration {
    let clamped = fps.clamp(1, 240);
    Duration::from_micros(1_000_000 / u64::from(clamped))
}
