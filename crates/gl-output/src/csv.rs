//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `emitters.csv`
//! - `messages.csv`
//! - `summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EmitterRow, MessageRow, OutputResult, SummaryRow};

pub const EMITTERS_FILE: &str = "emitters.csv";
pub const MESSAGES_FILE: &str = "messages.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

/// Writes a run report to three CSV files.
pub struct CsvWriter {
    emitters: Writer<File>,
    messages: Writer<File>,
    summary:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut emitters = Writer::from_path(dir.join(EMITTERS_FILE))?;
        emitters.write_record([
            "emitter_id",
            "attempted",
            "succeeded",
            "failed",
            "bytes_sent",
            "started_at_us",
            "stopped_at_us",
            "achieved_rate",
            "mean_latency_us",
            "max_latency_us",
            "stop_reason",
            "stop_detail",
        ])?;

        let mut messages = Writer::from_path(dir.join(MESSAGES_FILE))?;
        messages.write_record([
            "emitter_id", "seq", "sent_at_us", "size", "wait_us", "latency_us", "sent", "error",
        ])?;

        let mut summary = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summary.write_record([
            "started_at_utc",
            "participants",
            "emitter_count",
            "wall_clock_us",
            "target_rate",
            "target_aggregate_rate",
            "achieved_aggregate_rate",
            "rate_drift",
            "attempted",
            "succeeded",
            "failed",
            "bytes_sent",
            "early_stops",
            "mean_latency_us",
        ])?;

        Ok(Self {
            emitters,
            messages,
            summary,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_emitters(&mut self, rows: &[EmitterRow]) -> OutputResult<()> {
        for row in rows {
            self.emitters.write_record(&[
                row.emitter_id.to_string(),
                row.attempted.to_string(),
                row.succeeded.to_string(),
                row.failed.to_string(),
                row.bytes_sent.to_string(),
                row.started_at_us.to_string(),
                row.stopped_at_us.to_string(),
                format!("{:.3}", row.achieved_rate),
                row.mean_latency_us.to_string(),
                row.max_latency_us.to_string(),
                row.stop_reason.to_string(),
                row.stop_detail.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_messages(&mut self, rows: &[MessageRow]) -> OutputResult<()> {
        for row in rows {
            self.messages.write_record(&[
                row.emitter_id.to_string(),
                row.seq.to_string(),
                row.sent_at_us.to_string(),
                row.size.to_string(),
                row.wait_us.to_string(),
                row.latency_us.to_string(),
                (row.sent as u8).to_string(),
                row.error.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            row.started_at_utc.clone(),
            row.participants.to_string(),
            row.emitter_count.to_string(),
            row.wall_clock_us.to_string(),
            format!("{:.3}", row.target_rate),
            format!("{:.3}", row.target_aggregate_rate),
            format!("{:.3}", row.achieved_aggregate_rate),
            format!("{:.4}", row.rate_drift),
            row.attempted.to_string(),
            row.succeeded.to_string(),
            row.failed.to_string(),
            row.bytes_sent.to_string(),
            row.early_stops.to_string(),
            row.mean_latency_us.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.emitters.flush()?;
        self.messages.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
