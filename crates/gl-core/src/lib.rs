//! `gl-core` — foundational types for the `genload` traffic generator.
//!
//! This crate is a dependency of every other `gl-*` crate.  It has no `gl-*`
//! dependencies and keeps external ones small (`rand`, `thiserror`, `serde`,
//! and `tokio`'s monotonic clock).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `ParticipantId`                                       |
//! | [`time`]        | `RunClock` (origin + shared deadline)                 |
//! | [`rng`]         | `EmitterRng` (per-emitter), `RunRng` (run-level)      |
//! | [`config`]      | `RunConfig`, `RunSettings`, distribution enums        |
//! | [`error`]       | `GlError`, `ConfigError`, `GlResult`                  |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ArrivalDistribution, RunConfig, RunSettings, SizeDistribution};
pub use error::{ConfigError, GlError, GlResult};
pub use ids::ParticipantId;
pub use rng::{EmitterRng, RunRng};
pub use time::RunClock;
