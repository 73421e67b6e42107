//! `ReportOutputObserver<W>` — bridges `RunObserver` to an `OutputWriter`.

use tracing::{debug, warn};

use gl_sim::{RunObserver, RunReport};

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`RunObserver`] that writes the final report to any [`OutputWriter`]
/// backend (CSV, JSON, SQLite, …).
///
/// Errors from the writer are stored internally because `RunObserver` methods
/// have no return value.  After `coordinator.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct ReportOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> ReportOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            warn!(error = %e, "report output failed");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> RunObserver for ReportOutputObserver<W> {
    fn on_run_end(&mut self, report: &RunReport) {
        let result = self.writer.write_report(report);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
        debug!(emitters = report.emitters.len(), "report written");
    }
}
