//! `RunReport` — everything one run produced, aggregated once at the end.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use gl_core::{ParticipantId, RunConfig};
use gl_emitter::{EmitterState, LatencyStats};

use crate::RunPlan;

// ── RunTotals ─────────────────────────────────────────────────────────────────

/// Sums over every emitter of a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunTotals {
    pub attempted:   u64,
    pub succeeded:   u64,
    pub failed:      u64,
    pub bytes_sent:  u64,
    /// Emitters that stopped for a reason other than the deadline.
    pub early_stops: usize,
    pub latency:     LatencyStats,
}

impl RunTotals {
    pub fn from_states(states: &[EmitterState]) -> Self {
        let mut totals = RunTotals::default();
        for s in states {
            totals.attempted += s.attempted;
            totals.succeeded += s.succeeded;
            totals.failed += s.failed;
            totals.bytes_sent += s.bytes_sent;
            totals.early_stops += usize::from(s.stopped_early());
            totals.latency.merge(&s.latency);
        }
        totals
    }
}

impl fmt::Display for RunTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempted, {} sent, {} failed, {} bytes, {} early stops",
            self.attempted, self.succeeded, self.failed, self.bytes_sent, self.early_stops
        )?;
        if let Some(mean) = self.latency.mean() {
            write!(f, ", mean send latency {mean:?}")?;
        }
        Ok(())
    }
}

// ── RunReport ─────────────────────────────────────────────────────────────────

/// Final, immutable result of one run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub config:                  RunConfig,
    pub participants:            usize,
    pub emitter_count:           usize,
    pub started_at_utc:          DateTime<Utc>,
    /// Run origin to the last emitter's termination.
    pub wall_clock:              Duration,
    /// Messages per second, per emitter.
    pub target_rate:             f64,
    pub target_aggregate_rate:   f64,
    /// Successful sends per second of wall clock, over all emitters.
    pub achieved_aggregate_rate: f64,
    pub totals:                  RunTotals,
    /// Final per-emitter states, ascending by `ParticipantId`.
    pub emitters:                Vec<EmitterState>,
}

impl RunReport {
    /// Aggregate the final states of a run.  States are re-ordered by id.
    pub fn new(
        plan:           &RunPlan,
        started_at_utc: DateTime<Utc>,
        wall_clock:     Duration,
        mut emitters:   Vec<EmitterState>,
    ) -> Self {
        emitters.sort_by_key(|s| s.id);
        let totals = RunTotals::from_states(&emitters);
        let secs = wall_clock.as_secs_f64();
        let achieved_aggregate_rate =
            if secs > 0.0 { totals.succeeded as f64 / secs } else { 0.0 };

        RunReport {
            config: RunConfig::clone(plan.config()),
            participants: plan.participants(),
            emitter_count: plan.emitter_count(),
            started_at_utc,
            wall_clock,
            target_rate: plan.config().msg_rate(),
            target_aggregate_rate: plan.target_aggregate_rate(),
            achieved_aggregate_rate,
            totals,
            emitters,
        }
    }

    /// Achieved over target aggregate rate.  Below 1.0 when send latency or
    /// early stops held emitters back.
    pub fn rate_drift(&self) -> f64 {
        if self.target_aggregate_rate > 0.0 {
            self.achieved_aggregate_rate / self.target_aggregate_rate
        } else {
            0.0
        }
    }

    /// Final state of one emitter, if it took part.
    pub fn emitter(&self, id: ParticipantId) -> Option<&EmitterState> {
        self.emitters
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .map(|i| &self.emitters[i])
    }

    /// Emitters that stopped before the deadline.
    pub fn early_stops(&self) -> impl Iterator<Item = &EmitterState> {
        self.emitters.iter().filter(|s| s.stopped_early())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} emitters / {} participants over {:.3}s: {}; {:.2} msg/s of {:.2} target ({:.1}%)",
            self.emitter_count,
            self.participants,
            self.wall_clock.as_secs_f64(),
            self.totals,
            self.achieved_aggregate_rate,
            self.target_aggregate_rate,
            self.rate_drift() * 100.0,
        )
    }
}
