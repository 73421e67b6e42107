//! Deterministic per-emitter and run-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each emitter gets its own independent `SmallRng` seeded by:
//!
//!   seed = run_seed XOR (participant_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive participant IDs uniformly across the seed space.
//! This means:
//!
//! - Emitters never share RNG state, so there is no lock around sampling.
//! - An emitter's sampled sizes and waits depend only on the run seed and its
//!   own ID, not on how the runtime interleaves tasks.
//! - Growing the participant population does not disturb existing seeds.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::ParticipantId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── EmitterRng ────────────────────────────────────────────────────────────────

/// Per-emitter deterministic RNG.
///
/// Created by the coordinator and moved into the emitter's task.  Implements
/// [`RngCore`] so it can be handed straight to `rand` / `rand_distr`
/// distributions and to the `gl-dist` samplers.
#[derive(Clone, Debug)]
pub struct EmitterRng(SmallRng);

impl EmitterRng {
    /// Seed deterministically from the run seed and a participant ID.
    pub fn new(run_seed: u64, participant: ParticipantId) -> Self {
        let seed = run_seed ^ (participant.0 as u64).wrapping_mul(MIXING_CONSTANT);
        EmitterRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng`.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Fill `dest` with random bytes.
    #[inline]
    pub fn fill(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest);
    }
}

impl RngCore for EmitterRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

// ── RunRng ────────────────────────────────────────────────────────────────────

/// Run-level RNG for global decisions (which participants emit).
///
/// Used only by the coordinator before any emitter starts.
#[derive(Clone, Debug)]
pub struct RunRng(SmallRng);

impl RunRng {
    pub fn new(seed: u64) -> Self {
        RunRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
