//! Run time model.
//!
//! # Design
//!
//! A run has one origin instant and one absolute deadline:
//!
//!   deadline = origin + simulation_time
//!
//! Every emitter holds a copy of the same `RunClock`, so all of them compare
//! against the same instant and stop together regardless of their individual
//! drift.  Timestamps recorded in emitter state are offsets from `origin`,
//! which keeps them serializable and comparable across emitters.
//!
//! The clock reads `tokio::time::Instant`, which is monotonic and honours
//! `tokio::time::pause()` in tests.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::MAX_SIMULATION_TIME;

/// Shared origin and deadline for one run.
///
/// `RunClock` is `Copy` and holds no heap data.
#[derive(Copy, Clone, Debug)]
pub struct RunClock {
    origin:   Instant,
    deadline: Instant,
}

impl RunClock {
    /// Start a clock now that expires after `duration`.
    pub fn start(duration: Duration) -> Self {
        Self::starting_at(Instant::now(), duration)
    }

    /// Build a clock with an explicit origin.
    ///
    /// A deadline past the clock's range is pulled in to
    /// [`MAX_SIMULATION_TIME`] after `origin`.
    pub fn starting_at(origin: Instant, duration: Duration) -> Self {
        let deadline = origin
            .checked_add(duration)
            .or_else(|| origin.checked_add(MAX_SIMULATION_TIME))
            .unwrap_or(origin);
        Self { origin, deadline }
    }

    #[inline]
    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// The absolute instant at which every emitter must stop.
    #[inline]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Configured run length.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.deadline - self.origin
    }

    /// Time since origin, read now.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.offset_of(Instant::now())
    }

    /// Offset of `instant` from origin (zero if it precedes the origin).
    #[inline]
    pub fn offset_of(&self, instant: Instant) -> Duration {
        instant.saturating_duration_since(self.origin)
    }

    /// Time left until the deadline (zero once expired).
    #[inline]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

impl fmt::Display for RunClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3}s / {:.3}s",
            self.elapsed().as_secs_f64(),
            self.duration().as_secs_f64()
        )
    }
}
