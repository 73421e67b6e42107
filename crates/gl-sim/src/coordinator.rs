//! The `Coordinator` and its fan-out / fan-in.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::task::{self, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use gl_core::{EmitterRng, ParticipantId, RunClock};
use gl_emitter::{Emitter, EmitterState, PublisherFactory, StopReason};

use crate::{RunObserver, RunPlan, RunReport, SimResult};

// ── StopHandle ────────────────────────────────────────────────────────────────

/// Stops a running [`Coordinator`] from the outside (e.g. on Ctrl-C).
///
/// Emitters notice at their next wait step; the run still joins every task
/// and returns a full report.
#[derive(Clone, Debug)]
pub struct StopHandle(CancellationToken);

impl StopHandle {
    pub fn stop(&self) {
        self.0.cancel();
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.0.is_cancelled()
    }
}

// ── Coordinator ───────────────────────────────────────────────────────────────

/// Starts every emitter of a run, waits for all of them, and aggregates the
/// [`RunReport`].
///
/// Create via [`CoordinatorBuilder`][crate::CoordinatorBuilder].
pub struct Coordinator<F: PublisherFactory> {
    pub(crate) plan:    RunPlan,
    pub(crate) factory: F,
    pub(crate) stop:    CancellationToken,
}

impl<F: PublisherFactory> Coordinator<F> {
    #[inline]
    pub fn plan(&self) -> &RunPlan {
        &self.plan
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.stop.clone())
    }

    /// Run every emitter to termination and return the aggregated report.
    ///
    /// The deadline is fixed when this is called: `now + simulation_time`,
    /// shared by all emitters.  A publisher that cannot be created and an
    /// emitter task that panics are both recorded against that emitter only.
    pub async fn run<O: RunObserver>(self, observer: &mut O) -> SimResult<RunReport> {
        let Coordinator { plan, factory, stop } = self;
        let config = Arc::clone(plan.config());

        observer.on_run_start(&plan);
        let started_at_utc = Utc::now();
        let clock = RunClock::start(config.simulation_time());
        info!(%plan, deadline = %clock, "run started");

        let mut tasks = JoinSet::new();
        let mut running: HashMap<task::Id, ParticipantId> = HashMap::new();
        let mut finished = Vec::with_capacity(plan.emitter_count());

        for &id in plan.emitters() {
            match factory.create(id) {
                Ok(publisher) => {
                    let rng = EmitterRng::new(config.seed(), id);
                    let emitter = Emitter::new(id, Arc::clone(&config), publisher, clock, rng)
                        .with_stop_signal(stop.child_token());
                    let handle = tasks.spawn(emitter.run());
                    running.insert(handle.id(), id);
                }
                Err(e) => {
                    error!(emitter = %id, error = %e, "could not create publisher");
                    let now = clock.elapsed();
                    let mut state = EmitterState::new(id, now);
                    state.finish(now, StopReason::Unrecoverable(e.to_string()));
                    observer.on_emitter_finished(&state);
                    finished.push(state);
                }
            }
        }

        // A panicked task takes its state with it; the task id is all that
        // is left to tell which emitter it was.
        while let Some(joined) = tasks.join_next_with_id().await {
            let state = match joined {
                Ok((task_id, state)) => {
                    running.remove(&task_id);
                    state
                }
                Err(e) => {
                    let Some(id) = running.remove(&e.id()) else {
                        error!(error = %e, "unknown emitter task aborted");
                        continue;
                    };
                    error!(emitter = %id, error = %e, "emitter task aborted");
                    EmitterState::aborted(id, clock.elapsed(), abort_detail(e))
                }
            };
            observer.on_emitter_finished(&state);
            finished.push(state);
        }

        let wall_clock = clock.elapsed();
        let report = RunReport::new(&plan, started_at_utc, wall_clock, finished);
        info!(
            sent    = report.totals.succeeded,
            failed  = report.totals.failed,
            early   = report.totals.early_stops,
            rate    = report.achieved_aggregate_rate,
            target  = report.target_aggregate_rate,
            "run finished"
        );
        observer.on_run_end(&report);
        Ok(report)
    }
}

/// The panic message when there is one, the join error text otherwise.
fn abort_detail(e: task::JoinError) -> String {
    if !e.is_panic() {
        return e.to_string();
    }
    let payload = e.into_panic();
    match payload.downcast::<String>() {
        Ok(msg) => *msg,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_owned(),
            Err(_) => "emitter panicked".to_owned(),
        },
    }
}
