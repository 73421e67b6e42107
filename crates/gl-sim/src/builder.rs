//! Fluent builder for constructing a [`Coordinator`].

use tokio_util::sync::CancellationToken;

use gl_core::{RunConfig, RunSettings};
use gl_emitter::PublisherFactory;

use crate::{Coordinator, RunPlan, SimResult};

/// Fluent builder for [`Coordinator<F>`].
///
/// # Required inputs
///
/// - [`RunConfig`] (or a [`RunSettings`] layer via [`from_settings`][Self::from_settings])
/// - the total participant count
/// - `F: PublisherFactory` — one publisher per emitting participant
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                      |
/// |---------------------|------------------------------|
/// | `.stop_token(t)`    | A fresh `CancellationToken`  |
///
/// # Example
///
/// ```rust,ignore
/// let coordinator = CoordinatorBuilder::new(config, 500, ChannelPublisher::factory(tx))
///     .stop_token(shutdown.child_token())
///     .build()?;
/// let report = coordinator.run(&mut NoopObserver).await?;
/// ```
pub struct CoordinatorBuilder<F: PublisherFactory> {
    config:       RunConfig,
    participants: usize,
    factory:      F,
    stop:         Option<CancellationToken>,
}

impl<F: PublisherFactory> CoordinatorBuilder<F> {
    /// Create a builder with all required inputs.
    pub fn new(config: RunConfig, participants: usize, factory: F) -> Self {
        Self { config, participants, factory, stop: None }
    }

    /// Validate a settings layer into a [`RunConfig`] first.
    pub fn from_settings(settings: RunSettings, participants: usize, factory: F) -> SimResult<Self> {
        Ok(Self::new(settings.build()?, participants, factory))
    }

    /// Tie the run to an external cancellation token.
    ///
    /// Cancelling it stops every emitter at its next wait step, exactly like
    /// [`StopHandle::stop`][crate::StopHandle::stop].
    pub fn stop_token(mut self, token: CancellationToken) -> Self {
        self.stop = Some(token);
        self
    }

    /// Resolve the emitter set and return a ready-to-run [`Coordinator`].
    pub fn build(self) -> SimResult<Coordinator<F>> {
        let plan = RunPlan::new(self.config, self.participants)?;
        Ok(Coordinator {
            plan,
            factory: self.factory,
            stop:    self.stop.unwrap_or_default(),
        })
    }
}
