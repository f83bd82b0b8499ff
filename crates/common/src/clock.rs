//! Clock utilities for the mounted widget.
//!
//! Painted frames are stamped relative to the moment the widget mounted,
//! so a replayed session produces the same timeline on every run.

use std::time::Instant;

/// Source of frame timestamps.
pub trait FrameClock: Send + Sync {
    /// Milliseconds elapsed since the widget mounted.
    fn elapsed_ms(&self) -> u64;
}

/// A monotonic clock anchored at widget mount.
#[derive(Debug, Clone)]
pub struct MountClock {
    /// The instant the widget mounted.
    epoch: Instant,

    /// Wall-clock time at mount (RFC 3339), for log correlation.
    epoch_wall: String,
}

impl MountClock {
    /// Create a clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since mount.
    pub fn elapsed_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Wall-clock time at mount.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

impl FrameClock for MountClock {
    fn elapsed_ms(&self) -> u64 {
        MountClock::elapsed_ms(self)
    }
}

impl Default for MountClock {
    fn default() -> Self {
        Self::start()
    }
}
