//! Inter-arrival-time samplers.
//!
//! `rate` is the target messages per second of one emitter and is validated
//! finite and positive by `RunConfig`.

use std::time::Duration;

use rand::Rng;
use rand_distr::{Distribution, Exp};

use gl_core::{ArrivalDistribution, RunConfig};

/// Redraws allowed when an exponential draw comes back zero or non-finite.
const MAX_WAIT_REDRAWS: u32 = 8;

/// Exponential wait with mean `1 / rate` (a Poisson arrival process).
///
/// Exponential draws are non-negative by construction; a zero, sub-nanosecond
/// or non-finite draw can only come from floating-point edge cases and is
/// redrawn.  If every
/// redraw fails the mean wait is returned.
pub fn poisson_wait<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> Duration {
    let Ok(exp) = Exp::new(rate) else {
        return regular_wait(rate);
    };
    for _ in 0..MAX_WAIT_REDRAWS {
        let secs: f64 = exp.sample(rng);
        if secs.is_finite() && secs > 0.0 {
            match Duration::try_from_secs_f64(secs) {
                Ok(wait) if !wait.is_zero() => return wait,
                _ => {}
            }
        }
    }
    regular_wait(rate)
}

/// Fixed spacing of `1 / rate`.  Saturates at `Duration::MAX` for rates so
/// small the interval does not fit.
pub fn regular_wait(rate: f64) -> Duration {
    Duration::try_from_secs_f64(1.0 / rate).unwrap_or(Duration::MAX)
}

// ── ArrivalSampler ────────────────────────────────────────────────────────────

/// Config-driven wait sampler.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ArrivalSampler {
    Poisson { rate: f64 },
    Regular { rate: f64 },
}

impl ArrivalSampler {
    pub fn from_config(config: &RunConfig) -> Self {
        let rate = config.msg_rate();
        match config.arrival_distribution() {
            ArrivalDistribution::Poisson => ArrivalSampler::Poisson { rate },
            ArrivalDistribution::Regular => ArrivalSampler::Regular { rate },
        }
    }

    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        match *self {
            ArrivalSampler::Poisson { rate } => poisson_wait(rng, rate),
            ArrivalSampler::Regular { rate } => regular_wait(rate),
        }
    }

    /// Target messages per second.
    pub fn rate(&self) -> f64 {
        match *self {
            ArrivalSampler::Poisson { rate } | ArrivalSampler::Regular { rate } => rate,
        }
    }

    /// Expected wait between sends.
    pub fn mean_wait(&self) -> Duration {
        regular_wait(self.rate())
    }
}
