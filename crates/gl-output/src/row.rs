//! Plain data row types written by output backends.
//!
//! Durations are flattened to integer microseconds so every backend stores
//! the same numbers.

use std::time::Duration;

use chrono::SecondsFormat;
use serde::Serialize;

use gl_emitter::{EmitterState, MessageRecord, SendOutcome, StopReason};
use gl_sim::RunReport;

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

/// Final counters of one emitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmitterRow {
    pub emitter_id:      u32,
    pub attempted:       u64,
    pub succeeded:       u64,
    pub failed:          u64,
    pub bytes_sent:      u64,
    pub started_at_us:   u64,
    pub stopped_at_us:   u64,
    pub achieved_rate:   f64,
    /// Mean `send` latency; 0 when nothing was attempted.
    pub mean_latency_us: u64,
    pub max_latency_us:  u64,
    /// `deadline`, `unrecoverable`, `cancelled` or `aborted`.
    pub stop_reason:     &'static str,
    /// Error text for the early stop reasons, empty otherwise.
    pub stop_detail:     String,
}

impl EmitterRow {
    pub fn from_state(state: &EmitterState) -> Self {
        let (stop_reason, stop_detail) = match &state.stop_reason {
            Some(StopReason::Deadline) | None => ("deadline", String::new()),
            Some(StopReason::Unrecoverable(d)) => ("unrecoverable", d.clone()),
            Some(StopReason::Cancelled) => ("cancelled", String::new()),
            Some(StopReason::Aborted(d)) => ("aborted", d.clone()),
        };
        EmitterRow {
            emitter_id:      state.id.0,
            attempted:       state.attempted,
            succeeded:       state.succeeded,
            failed:          state.failed,
            bytes_sent:      state.bytes_sent,
            started_at_us:   micros(state.started_at),
            stopped_at_us:   micros(state.stopped_at.unwrap_or(state.started_at)),
            achieved_rate:   state.achieved_rate(),
            mean_latency_us: state.latency.mean().map_or(0, micros),
            max_latency_us:  micros(state.latency.max),
            stop_reason,
            stop_detail,
        }
    }
}

/// One publish attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRow {
    pub emitter_id: u32,
    pub seq:        u64,
    pub sent_at_us: u64,
    pub size:       u64,
    pub wait_us:    u64,
    pub latency_us: u64,
    pub sent:       bool,
    /// Send error text; empty for successful sends.
    pub error:      String,
}

impl MessageRow {
    pub fn from_record(emitter_id: u32, record: &MessageRecord) -> Self {
        let error = match &record.outcome {
            SendOutcome::Sent => String::new(),
            SendOutcome::Failed { error, .. } => error.clone(),
        };
        MessageRow {
            emitter_id,
            seq:        record.seq,
            sent_at_us: micros(record.sent_at),
            size:       record.size as u64,
            wait_us:    micros(record.wait),
            latency_us: micros(record.latency),
            sent:       record.outcome.is_sent(),
            error,
        }
    }

    /// Every retained record of a run, emitter by emitter.
    pub fn all(report: &RunReport) -> Vec<MessageRow> {
        report
            .emitters
            .iter()
            .flat_map(|s| s.messages.iter().map(move |m| MessageRow::from_record(s.id.0, m)))
            .collect()
    }
}

/// Run-level aggregate, one row per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    /// RFC 3339, UTC.
    pub started_at_utc:          String,
    pub participants:            u64,
    pub emitter_count:           u64,
    pub wall_clock_us:           u64,
    pub target_rate:             f64,
    pub target_aggregate_rate:   f64,
    pub achieved_aggregate_rate: f64,
    pub rate_drift:              f64,
    pub attempted:               u64,
    pub succeeded:               u64,
    pub failed:                  u64,
    pub bytes_sent:              u64,
    pub early_stops:             u64,
    pub mean_latency_us:         u64,
}

impl SummaryRow {
    pub fn from_report(report: &RunReport) -> Self {
        let t = &report.totals;
        SummaryRow {
            started_at_utc:          report.started_at_utc.to_rfc3339_opts(SecondsFormat::Millis, true),
            participants:            report.participants as u64,
            emitter_count:           report.emitter_count as u64,
            wall_clock_us:           micros(report.wall_clock),
            target_rate:             report.target_rate,
            target_aggregate_rate:   report.target_aggregate_rate,
            achieved_aggregate_rate: report.achieved_aggregate_rate,
            rate_drift:              report.rate_drift(),
            attempted:               t.attempted,
            succeeded:               t.succeeded,
            failed:                  t.failed,
            bytes_sent:              t.bytes_sent,
            early_stops:             t.early_stops as u64,
            mean_latency_us:         t.latency.mean().map_or(0, micros),
        }
    }
}
