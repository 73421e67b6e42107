//! Who emits: emitter count and seeded selection.

use std::fmt;
use std::sync::Arc;

use rand::seq::index;

use gl_core::{ParticipantId, RunConfig, RunRng};

use crate::{SimError, SimResult};

/// Number of emitters for `total` participants.
///
/// `round(total × fraction)`, at least 1 whenever `total >= 1` and
/// `fraction > 0`, never more than `total`.
pub fn emitter_count(total: usize, fraction: f64) -> usize {
    if total == 0 || fraction.is_nan() || fraction <= 0.0 {
        return 0;
    }
    let raw = (total as f64 * fraction).round();
    if raw >= total as f64 { total } else { (raw as usize).max(1) }
}

/// `count` distinct participants drawn without replacement from `0..total`,
/// sorted ascending.  `count` is capped at `total`.
pub fn select_emitters(total: usize, count: usize, rng: &mut RunRng) -> Vec<ParticipantId> {
    let count = count.min(total);
    let mut picked: Vec<ParticipantId> = index::sample(rng.inner(), total, count)
        .into_iter()
        // `total` has been checked against the u32 range by `RunPlan::new`.
        .map(|i| ParticipantId(i as u32))
        .collect();
    picked.sort_unstable();
    picked
}

/// The resolved shape of a run, fixed before any emitter starts.
#[derive(Clone, Debug)]
pub struct RunPlan {
    config:       Arc<RunConfig>,
    participants: usize,
    emitters:     Vec<ParticipantId>,
}

impl RunPlan {
    /// Resolve the emitter set for `participants` under `config`.
    pub fn new(config: RunConfig, participants: usize) -> SimResult<Self> {
        if participants == 0 {
            return Err(SimError::NoParticipants);
        }
        if u32::try_from(participants).is_err() {
            return Err(SimError::TooManyParticipants(participants));
        }
        let count = emitter_count(participants, config.emitters_fraction());
        let mut rng = RunRng::new(config.seed());
        let emitters = select_emitters(participants, count, &mut rng);
        Ok(RunPlan { config: Arc::new(config), participants, emitters })
    }

    #[inline]
    pub fn config(&self) -> &Arc<RunConfig> {
        &self.config
    }

    #[inline]
    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Emitting participants, ascending.
    #[inline]
    pub fn emitters(&self) -> &[ParticipantId] {
        &self.emitters
    }

    #[inline]
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// `msg_rate × emitter_count`.
    pub fn target_aggregate_rate(&self) -> f64 {
        self.config.msg_rate() * self.emitters.len() as f64
    }
}

impl fmt::Display for RunPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} participants emitting; {}",
            self.emitters.len(),
            self.participants,
            self.config
        )
    }
}
