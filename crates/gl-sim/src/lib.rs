//! `gl-sim` — run coordinator for the genload traffic generator.
//!
//! # One run
//!
//! ```text
//! ① Plan      — emitter_count = round(participants × emitters_fraction),
//!               pick that many distinct ParticipantIds with the run seed
//! ② Fan out   — one Publisher + EmitterRng per emitter, one tokio task each,
//!               all sharing one absolute deadline and one stop token
//! ③ Fan in    — join every task (a panicked task becomes an Aborted state)
//! ④ Report    — sort states by ParticipantId, aggregate into RunReport
//! ```
//!
//! Only configuration problems are errors here.  Once a run has started it
//! always ends with a [`RunReport`], however many emitters failed.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gl_emitter::NullPublisher;
//! use gl_sim::{CoordinatorBuilder, NoopObserver};
//!
//! let coordinator = CoordinatorBuilder::new(config, 100, NullPublisher::factory()).build()?;
//! let report = coordinator.run(&mut NoopObserver).await?;
//! println!("{}", report.totals);
//! ```

pub mod builder;
pub mod coordinator;
pub mod error;
pub mod observer;
pub mod plan;
pub mod report;


pub use builder::CoordinatorBuilder;
pub use coordinator::{Coordinator, StopHandle};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, RunObserver};
pub use plan::{RunPlan, emitter_count, select_emitters};
pub use report::{RunReport, RunTotals};
