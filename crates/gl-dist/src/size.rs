//! Message-size samplers.
//!
//! # Truncated normal
//!
//! Parameters are derived from the configured range:
//!
//!   mean   = (max - min) / 2 + min
//!   stddev = (max - min) / stddev_divisor
//!
//! A draw is rounded to the nearest integer and kept if it lies in
//! `[min, max]`.  Out-of-range draws are redrawn at most
//! [`TRUNCATED_NORMAL_MAX_DRAWS`] times in total; after that the last draw is
//! clamped, so sampling always terminates.  With the default divisor of 5 the
//! bounds sit 2.5 σ from the mean and ~1.2 % of draws are rejected, so the
//! clamp fallback is practically never reached.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::warn;

use gl_core::{RunConfig, SizeDistribution};

/// Upper bound on normal draws per truncated-normal sample.
pub const TRUNCATED_NORMAL_MAX_DRAWS: u32 = 32;

/// Uniform integer in `[min, max]`, inclusive.  `min == max` yields `min`.
pub fn uniform_size<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> usize {
    debug_assert!(min <= max, "size range inverted: {min} > {max}");
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Truncated-normal size in `[min, max]`.  See the module docs.
pub fn truncated_normal_size<R: Rng + ?Sized>(
    rng:            &mut R,
    min:            usize,
    max:            usize,
    stddev_divisor: f64,
) -> usize {
    sample_truncated_normal(rng, min, max, stddev_divisor).size
}

/// Outcome of one truncated-normal sample, with the work it took.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TruncatedDraw {
    pub size:    usize,
    /// Normal draws consumed (`0` for a degenerate range).
    pub draws:   u32,
    /// `true` if every draw fell outside the range and the last was clamped.
    pub clamped: bool,
}

/// Like [`truncated_normal_size`] but reports how many draws were needed.
pub fn sample_truncated_normal<R: Rng + ?Sized>(
    rng:            &mut R,
    min:            usize,
    max:            usize,
    stddev_divisor: f64,
) -> TruncatedDraw {
    debug_assert!(min <= max, "size range inverted: {min} > {max}");
    if min >= max {
        return TruncatedDraw { size: min, draws: 0, clamped: false };
    }

    let (lo, hi) = (min as f64, max as f64);
    let range = hi - lo;
    let mean = range / 2.0 + lo;
    let stddev = range / stddev_divisor;

    let Ok(normal) = Normal::new(mean, stddev) else {
        // Non-finite stddev: nothing sensible to draw from.
        return TruncatedDraw { size: mean.round() as usize, draws: 0, clamped: true };
    };

    let mut last = mean;
    for draw in 1..=TRUNCATED_NORMAL_MAX_DRAWS {
        let x = normal.sample(rng).round();
        if (lo..=hi).contains(&x) {
            return TruncatedDraw { size: x as usize, draws: draw, clamped: false };
        }
        last = x;
    }

    TruncatedDraw {
        size:    last.clamp(lo, hi) as usize,
        draws:   TRUNCATED_NORMAL_MAX_DRAWS,
        clamped: true,
    }
}

// ── SizeSampler ───────────────────────────────────────────────────────────────

/// Config-driven size sampler.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SizeSampler {
    /// Degenerate range: every message has the same size.
    Constant(usize),
    Uniform { min: usize, max: usize },
    TruncatedNormal { min: usize, max: usize, stddev_divisor: f64 },
}

impl SizeSampler {
    pub fn from_config(config: &RunConfig) -> Self {
        let (min, max) = (config.min_msg_size(), config.max_msg_size());
        if min == max {
            warn!(size = min, "message size is constant: min_msg_size == max_msg_size");
            return SizeSampler::Constant(min);
        }
        match config.size_distribution() {
            SizeDistribution::Uniform => SizeSampler::Uniform { min, max },
            SizeDistribution::TruncatedNormal => SizeSampler::TruncatedNormal {
                min,
                max,
                stddev_divisor: config.stddev_divisor(),
            },
        }
    }

    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match *self {
            SizeSampler::Constant(size) => size,
            SizeSampler::Uniform { min, max } => uniform_size(rng, min, max),
            SizeSampler::TruncatedNormal { min, max, stddev_divisor } => {
                truncated_normal_size(rng, min, max, stddev_divisor)
            }
        }
    }

    /// Expected size (the range midpoint for both symmetric laws).
    pub fn mean(&self) -> f64 {
        match *self {
            SizeSampler::Constant(size) => size as f64,
            SizeSampler::Uniform { min, max } | SizeSampler::TruncatedNormal { min, max, .. } => {
                (min + max) as f64 / 2.0
            }
        }
    }
}
