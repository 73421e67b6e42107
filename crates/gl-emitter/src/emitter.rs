//! The `Emitter` and its send loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use gl_core::{EmitterRng, ParticipantId, RunClock, RunConfig};
use gl_dist::{ArrivalSampler, SizeSampler};

use crate::payload::{PayloadHeader, build_payload, unix_nanos_now};
use crate::{EmitterState, MessageRecord, Publisher, SendOutcome, StopReason};

/// How a wait step ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Wake {
    /// The sampled wait elapsed before the deadline.
    Ready,
    /// The deadline fell inside the wait window.
    Deadline,
    /// The stop signal fired.
    Cancelled,
}

/// Drives one participant's publish loop from start to the shared deadline.
///
/// The emitter owns its publisher, RNG and state; the config is shared
/// read-only with every other emitter of the run.
///
/// # Example
///
/// ```rust,ignore
/// let clock = RunClock::start(config.simulation_time());
/// let emitter = Emitter::new(id, Arc::new(config), NullPublisher, clock, EmitterRng::new(seed, id));
/// let state = emitter.run().await;
/// ```
pub struct Emitter<P: Publisher> {
    id:        ParticipantId,
    config:    Arc<RunConfig>,
    publisher: P,
    clock:     RunClock,
    rng:       EmitterRng,
    stop:      CancellationToken,
    sizes:     SizeSampler,
    arrivals:  ArrivalSampler,
}

impl<P: Publisher> Emitter<P> {
    pub fn new(
        id:        ParticipantId,
        config:    Arc<RunConfig>,
        publisher: P,
        clock:     RunClock,
        rng:       EmitterRng,
    ) -> Self {
        let sizes = SizeSampler::from_config(&config);
        let arrivals = ArrivalSampler::from_config(&config);
        Self {
            id,
            config,
            publisher,
            clock,
            rng,
            stop: CancellationToken::new(),
            sizes,
            arrivals,
        }
    }

    /// Stop early when `token` is cancelled (checked at every wait step).
    pub fn with_stop_signal(mut self, token: CancellationToken) -> Self {
        self.stop = token;
        self
    }

    #[inline]
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// Run the send loop to completion and return the finished state.
    ///
    /// Never fails: send errors are recorded in the state, and the loop ends
    /// at the deadline, on the stop signal, or on an unrecoverable error.
    pub async fn run(mut self) -> EmitterState {
        let mut state = EmitterState::new(self.id, self.clock.elapsed());
        let keep_records = self.config.record_messages();
        info!(emitter = %self.id, sizes = ?self.sizes, arrivals = ?self.arrivals, "emitter started");

        let reason = loop {
            // ① Wait.  Measured from now, i.e. after the previous send
            // returned: send latency is not subtracted from the next wait.
            let wait = self.arrivals.sample(&mut self.rng);
            debug!(emitter = %self.id, wait_ms = wait.as_secs_f64() * 1e3, "next send");
            match suspend(&self.clock, &self.stop, wait).await {
                Wake::Ready     => {}
                Wake::Deadline  => break StopReason::Deadline,
                Wake::Cancelled => break StopReason::Cancelled,
            }

            // ② Deadline.
            if self.clock.is_expired() {
                break StopReason::Deadline;
            }

            // ③ Build.
            let size = self.sizes.sample(&mut self.rng);
            let header = PayloadHeader { seq: state.attempted, sent_at_unix_nanos: unix_nanos_now() };
            let payload = build_payload(&mut self.rng, header, size);

            // ④ Publish.
            let sent_at = self.clock.elapsed();
            let t0 = Instant::now();
            let result = self.publisher.send(payload).await;
            let latency = t0.elapsed();

            // ⑤ Record.
            let (outcome, fatal) = match result {
                Ok(_ack) => {
                    debug!(emitter = %self.id, seq = header.seq, size, "sent");
                    (SendOutcome::Sent, None)
                }
                Err(e) if e.is_recoverable() => {
                    warn!(emitter = %self.id, seq = header.seq, error = %e, "send failed; continuing");
                    (SendOutcome::Failed { error: e.to_string(), recoverable: true }, None)
                }
                Err(e) => {
                    error!(emitter = %self.id, seq = header.seq, error = %e, "send failed; stopping emitter");
                    let detail = e.to_string();
                    (
                        SendOutcome::Failed { error: detail.clone(), recoverable: false },
                        Some(detail),
                    )
                }
            };
            state.record_attempt(
                MessageRecord { seq: header.seq, sent_at, size, wait, latency, outcome },
                keep_records,
            );
            if let Some(detail) = fatal {
                break StopReason::Unrecoverable(detail);
            }
        };

        state.finish(self.clock.elapsed(), reason);
        info!(
            emitter   = %self.id,
            attempted = state.attempted,
            succeeded = state.succeeded,
            bytes     = state.bytes_sent,
            reason    = ?state.stop_reason,
            "emitter stopped"
        );
        state
    }
}

/// Sleep for `wait`, waking early at the deadline or on the stop signal.
///
/// Borrows only the clock and token so the emitter future stays `Send` for
/// any `Send` publisher.
async fn suspend(clock: &RunClock, stop: &CancellationToken, wait: Duration) -> Wake {
    let deadline = clock.deadline();
    let (until, on_timer) = match Instant::now().checked_add(wait) {
        Some(at) if at < deadline => (at, Wake::Ready),
        _ => (deadline, Wake::Deadline),
    };
    tokio::select! {
        biased;
        _ = stop.cancelled()   => Wake::Cancelled,
        _ = sleep_until(until) => on_timer,
    }
}
