//! Run observer trait for progress reporting and data collection.

use gl_emitter::EmitterState;

use crate::{RunPlan, RunReport};

/// Callbacks invoked by [`Coordinator::run`][crate::Coordinator::run] at key
/// points of a run.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress { done: usize, of: usize }
///
/// impl RunObserver for Progress {
///     fn on_run_start(&mut self, plan: &RunPlan) {
///         self.of = plan.emitter_count();
///     }
///     fn on_emitter_finished(&mut self, state: &EmitterState) {
///         self.done += 1;
///         println!("{}/{}: {} sent {}", self.done, self.of, state.id, state.succeeded);
///     }
/// }
/// ```
pub trait RunObserver {
    /// Called once, after the emitter set is fixed and before any emitter
    /// starts.
    fn on_run_start(&mut self, _plan: &RunPlan) {}

    /// Called once per emitter, in termination order, with its final state.
    fn on_emitter_finished(&mut self, _state: &EmitterState) {}

    /// Called once with the aggregated report, after every emitter has
    /// terminated.
    ///
    /// Output writers hook in here so the coordinator never needs to know
    /// about any specific output format.
    fn on_run_end(&mut self, _report: &RunReport) {}
}

/// A [`RunObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
