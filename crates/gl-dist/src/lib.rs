//! `gl-dist` — the distributions behind synthetic traffic.
//!
//! Every sampler is a pure function of its parameters and an injected random
//! source.  Nothing here touches a global RNG, so a run is reproducible given
//! its seed.
//!
//! | Module        | Samples                              | Laws                        |
//! |---------------|--------------------------------------|-----------------------------|
//! | [`size`]      | payload length in bytes              | uniform, truncated normal   |
//! | [`arrival`]   | wait before an emitter's next send   | Poisson (exponential), regular |
//!
//! Each module offers free functions (`uniform_size`, `poisson_wait`, …) and a
//! config-driven dispatcher (`SizeSampler`, `ArrivalSampler`) that an emitter
//! builds once from its `RunConfig`.

pub mod arrival;
pub mod size;

#[cfg(test)]
mod tests;

pub use arrival::{ArrivalSampler, poisson_wait, regular_wait};
pub use size::{
    SizeSampler, TRUNCATED_NORMAL_MAX_DRAWS, TruncatedDraw, sample_truncated_normal,
    truncated_normal_size, uniform_size,
};
