//! `EmitterState` — what one emitter did during a run.
//!
//! Owned by exactly one emitter task and mutated only inside its send loop.
//! The coordinator receives it by value once the task ends, at which point it
//! is finished (`stopped_at` set) and never mutated again.
//!
//! Timestamps are offsets from the run clock origin (see `gl_core::RunClock`).

use std::time::Duration;

use serde::Serialize;

use gl_core::ParticipantId;

// ── StopReason ────────────────────────────────────────────────────────────────

/// Why an emitter's loop ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StopReason {
    /// The shared deadline was reached.  The normal path.
    Deadline,
    /// The publisher failed permanently (or could not be created).
    Unrecoverable(String),
    /// The run's stop signal fired before the deadline.
    Cancelled,
    /// The emitter task panicked; counters were lost with it.
    Aborted(String),
}

impl StopReason {
    /// `true` for anything other than reaching the deadline.
    #[inline]
    pub fn is_early(&self) -> bool {
        !matches!(self, StopReason::Deadline)
    }
}

// ── MessageRecord ─────────────────────────────────────────────────────────────

/// Result of one publish attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendOutcome {
    Sent,
    Failed { error: String, recoverable: bool },
}

impl SendOutcome {
    #[inline]
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent)
    }
}

/// One publish attempt, as seen by the emitter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
    /// Per-emitter sequence number, also written into the payload header.
    pub seq:     u64,
    /// Offset from the run origin at which `send` was called.
    pub sent_at: Duration,
    pub size:    usize,
    /// Sampled inter-arrival wait that preceded this send.
    pub wait:    Duration,
    /// Duration of the `send` call.
    pub latency: Duration,
    pub outcome: SendOutcome,
}

// ── LatencyStats ──────────────────────────────────────────────────────────────

/// Running summary of `Publisher::send` call durations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LatencyStats {
    pub count: u64,
    pub total: Duration,
    pub min:   Option<Duration>,
    pub max:   Duration,
}

impl LatencyStats {
    pub fn record(&mut self, latency: Duration) {
        self.count += 1;
        self.total += latency;
        self.min = Some(self.min.map_or(latency, |m| m.min(latency)));
        self.max = self.max.max(latency);
    }

    /// Combine two summaries (used for run totals).
    pub fn merge(&mut self, other: &LatencyStats) {
        self.count += other.count;
        self.total += other.total;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = self.max.max(other.max);
    }

    pub fn mean(&self) -> Option<Duration> {
        let count = u32::try_from(self.count).ok().filter(|&c| c > 0)?;
        Some(self.total / count)
    }
}

// ── EmitterState ──────────────────────────────────────────────────────────────

/// Counters and timeline of one emitter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmitterState {
    pub id:          ParticipantId,
    pub attempted:   u64,
    pub succeeded:   u64,
    pub failed:      u64,
    /// Bytes of successfully published payloads.
    pub bytes_sent:  u64,
    pub started_at:  Duration,
    pub stopped_at:  Option<Duration>,
    pub stop_reason: Option<StopReason>,
    pub latency:     LatencyStats,
    /// Per-attempt records; empty when message recording is disabled.
    pub messages:    Vec<MessageRecord>,
}

impl EmitterState {
    /// A zeroed state for an emitter starting at `started_at`.
    pub fn new(id: ParticipantId, started_at: Duration) -> Self {
        Self {
            id,
            attempted:   0,
            succeeded:   0,
            failed:      0,
            bytes_sent:  0,
            started_at,
            stopped_at:  None,
            stop_reason: None,
            latency:     LatencyStats::default(),
            messages:    Vec::new(),
        }
    }

    /// A finished state for an emitter whose task died before reporting.
    pub fn aborted(id: ParticipantId, at: Duration, detail: impl Into<String>) -> Self {
        let mut state = Self::new(id, at);
        state.finish(at, StopReason::Aborted(detail.into()));
        state
    }

    /// Account for one publish attempt.  `keep` controls whether the record
    /// itself is retained.
    pub fn record_attempt(&mut self, record: MessageRecord, keep: bool) {
        debug_assert!(self.stopped_at.is_none(), "{} recorded a send after stopping", self.id);
        self.attempted += 1;
        if record.outcome.is_sent() {
            self.succeeded += 1;
            self.bytes_sent += record.size as u64;
        } else {
            self.failed += 1;
        }
        self.latency.record(record.latency);
        if keep {
            self.messages.push(record);
        }
    }

    /// Mark the emitter stopped.  Only the first call has any effect; returns
    /// whether this call did.
    pub fn finish(&mut self, at: Duration, reason: StopReason) -> bool {
        if self.stopped_at.is_some() {
            return false;
        }
        self.stopped_at = Some(at.max(self.started_at));
        self.stop_reason = Some(reason);
        true
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// `true` if the emitter stopped for any reason other than the deadline.
    pub fn stopped_early(&self) -> bool {
        self.stop_reason.as_ref().is_some_and(StopReason::is_early)
    }

    /// Time between start and stop (zero while still running).
    pub fn active_time(&self) -> Duration {
        self.stopped_at
            .map_or(Duration::ZERO, |stop| stop.saturating_sub(self.started_at))
    }

    /// Successful sends per second of active time.
    pub fn achieved_rate(&self) -> f64 {
        let secs = self.active_time().as_secs_f64();
        if secs > 0.0 { self.succeeded as f64 / secs } else { 0.0 }
    }
}
