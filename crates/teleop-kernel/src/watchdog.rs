//! [`LatencyWatchdog`] – inter-frame silence detector for one connection.
//!
//! The connection loop calls [`LatencyWatchdog::observe`] with the arrival
//! time of every frame.  The clock only starts with the first frame; from
//! then on, a gap longer than the threshold between two frames trips the
//! watchdog.  [`LatencyWatchdog::deadline`] tells the reader how long it may
//! wait for the next frame before the silence itself counts as a trip.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use teleop_kernel::watchdog::LatencyWatchdog;
//!
//! let mut wd = LatencyWatchdog::new(Duration::from_secs(2));
//! let t0 = Instant::now();
//! assert!(wd.observe(t0).is_ok());
//! assert!(wd.observe(t0 + Duration::from_millis(1500)).is_ok());
//! assert!(wd.observe(t0 + Duration::from_millis(4000)).is_err());
//! ```

use std::time::{Duration, Instant};

// ────────────────────────────────────────────────────────────────────────────
// Public types
// ────────────────────────────────────────────────────────────────────────────

/// Liveness of the stream as seen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkHealth {
    /// No frame has arrived yet; the clock is not running.
    Waiting,
    /// The last frame arrived within the threshold.
    Healthy,
    /// The last frame is older than the threshold.
    TimedOut,
}

// ────────────────────────────────────────────────────────────────────────────
// LatencyWatchdog
// ────────────────────────────────────────────────────────────────────────────

/// Tracks frame arrival times and detects excessive inter-frame silence.
#[derive(Debug, Clone)]
pub struct LatencyWatchdog {
    threshold: Duration,
    last_frame: Option<Instant>,
}

impl LatencyWatchdog {
    /// A watchdog tripping on gaps strictly longer than `threshold`.
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_frame: None,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Record a frame arriving at `at`.
    ///
    /// # Errors
    ///
    /// Returns the gap since the previous frame when it exceeds the
    /// threshold.  The watchdog is reset in that case, so the clock only
    /// restarts with the next frame.
    pub fn observe(&mut self, at: Instant) -> Result<(), Duration> {
        if let Some(previous) = self.last_frame {
            let gap = at.saturating_duration_since(previous);
            if gap > self.threshold {
                self.last_frame = None;
                return Err(gap);
            }
        }
        self.last_frame = Some(at);
        Ok(())
    }

    /// Latest instant the next frame may arrive at, or `None` before the
    /// first frame.
    pub fn deadline(&self) -> Option<Instant> {
        self.last_frame.map(|last| last + self.threshold)
    }

    /// Liveness as of `now`.
    pub fn health(&self, now: Instant) -> LinkHealth {
        match self.last_frame {
            None => LinkHealth::Waiting,
            Some(last) if now.saturating_duration_since(last) <= self.threshold => {
                LinkHealth::Healthy
            }
            Some(_) => LinkHealth::TimedOut,
        }
    }
}
