//! Timing helpers: the scroll debounce timer and frame statistics.
//!
//! Both take the current [`Instant`] as an argument instead of reading the
//! clock themselves, so the host decides what "now" is and tests can step
//! time explicitly.
//!
//! ```ignore
//! let mut quiet = Debounce::new(Duration::from_millis(10));
//! quiet.schedule(Instant::now());          // scroll tick
//! // ... later, from the event loop:
//! if quiet.poll(Instant::now()) {
//!     // burst is over
//! }
//! ```

use std::time::{Duration, Instant};

/// A single cancelable one-shot timer.
///
/// Scheduling while armed replaces the deadline, so at most one timer is
/// ever outstanding.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the timer to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Disarm the timer. Harmless when already disarmed.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once when the deadline has passed, disarming
    /// the timer.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Frame counter with a periodically refreshed FPS estimate.
#[derive(Debug)]
pub struct FrameStats {
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_secs(1),
        }
    }

    /// Count a frame. Returns the new FPS estimate when one was computed.
    pub fn record(&mut self, now: Instant) -> Option<f32> {
        self.frame_count += 1;

        let since = now.saturating_duration_since(self.fps_update_time);
        if since < self.fps_update_interval {
            return None;
        }
        let frames = self.frame_count - self.fps_frame_count;
        self.fps = frames as f32 / since.as_secs_f32();
        self.fps_frame_count = self.frame_count;
        self.fps_update_time = now;
        Some(self.fps)
    }

    /// Total frames recorded.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Last FPS estimate.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
