//! JSON output backend.
//!
//! Writes a single pretty-printed `report.json` on [`finish`][OutputWriter::finish].
//! Given a whole [`RunReport`] it stores the report as is; fed row by row it
//! stores `{ "summary", "emitters", "messages" }`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use gl_sim::RunReport;

use crate::writer::OutputWriter;
use crate::{EmitterRow, MessageRow, OutputResult, SummaryRow};

pub const REPORT_FILE: &str = "report.json";

#[derive(Default, Serialize)]
struct RowDocument {
    summary:  Option<SummaryRow>,
    emitters: Vec<EmitterRow>,
    messages: Vec<MessageRow>,
}

/// Buffers the report in memory and writes `report.json` once.
pub struct JsonWriter {
    path:     PathBuf,
    report:   Option<Value>,
    rows:     RowDocument,
    finished: bool,
}

impl JsonWriter {
    /// Target `report.json` in `dir`.  The file is created by `finish`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        if !dir.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("output directory {} does not exist", dir.display()),
            )
            .into());
        }
        Ok(Self {
            path:     dir.join(REPORT_FILE),
            report:   None,
            rows:     RowDocument::default(),
            finished: false,
        })
    }
}

impl OutputWriter for JsonWriter {
    fn write_emitters(&mut self, rows: &[EmitterRow]) -> OutputResult<()> {
        self.rows.emitters.extend_from_slice(rows);
        Ok(())
    }

    fn write_messages(&mut self, rows: &[MessageRow]) -> OutputResult<()> {
        self.rows.messages.extend_from_slice(rows);
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.rows.summary = Some(row.clone());
        Ok(())
    }

    fn write_report(&mut self, report: &RunReport) -> OutputResult<()> {
        self.report = Some(serde_json::to_value(report)?);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        let mut out = BufWriter::new(File::create(&self.path)?);
        match &self.report {
            Some(report) => serde_json::to_writer_pretty(&mut out, report)?,
            None => serde_json::to_writer_pretty(&mut out, &self.rows)?,
        }
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}
