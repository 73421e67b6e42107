//! The `OutputWriter` trait implemented by all backend writers.

use gl_sim::RunReport;

use crate::{EmitterRow, MessageRow, OutputResult, SummaryRow};

/// Trait implemented by CSV, JSON, and SQLite writers.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`ReportOutputObserver::take_error`][crate::ReportOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one row per emitter.
    fn write_emitters(&mut self, rows: &[EmitterRow]) -> OutputResult<()>;

    /// Write a batch of per-message rows.
    fn write_messages(&mut self, rows: &[MessageRow]) -> OutputResult<()>;

    /// Write the run summary row.
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Write everything in `report`.
    ///
    /// The default flattens the report into rows; backends that store the
    /// report as a whole override it.
    fn write_report(&mut self, report: &RunReport) -> OutputResult<()> {
        self.write_summary(&SummaryRow::from_report(report))?;
        let emitters: Vec<EmitterRow> = report.emitters.iter().map(EmitterRow::from_state).collect();
        self.write_emitters(&emitters)?;
        self.write_messages(&MessageRow::all(report))
    }

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<W: OutputWriter + ?Sized> OutputWriter for Box<W> {
    fn write_emitters(&mut self, rows: &[EmitterRow]) -> OutputResult<()> {
        (**self).write_emitters(rows)
    }

    fn write_messages(&mut self, rows: &[MessageRow]) -> OutputResult<()> {
        (**self).write_messages(rows)
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        (**self).write_summary(row)
    }

    fn write_report(&mut self, report: &RunReport) -> OutputResult<()> {
        (**self).write_report(report)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}

/// Several writers fed the same output.  Every writer is called even after
/// one fails; the first error is returned.
impl OutputWriter for Vec<Box<dyn OutputWriter>> {
    fn write_emitters(&mut self, rows: &[EmitterRow]) -> OutputResult<()> {
        first_error(self.iter_mut().map(|w| w.write_emitters(rows)))
    }

    fn write_messages(&mut self, rows: &[MessageRow]) -> OutputResult<()> {
        first_error(self.iter_mut().map(|w| w.write_messages(rows)))
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        first_error(self.iter_mut().map(|w| w.write_summary(row)))
    }

    fn write_report(&mut self, report: &RunReport) -> OutputResult<()> {
        first_error(self.iter_mut().map(|w| w.write_report(report)))
    }

    fn finish(&mut self) -> OutputResult<()> {
        first_error(self.iter_mut().map(|w| w.finish()))
    }
}

fn first_error(results: impl Iterator<Item = OutputResult<()>>) -> OutputResult<()> {
    let mut first = Ok(());
    for result in results {
        if first.is_ok() {
            first = result;
        }
    }
    first
}
