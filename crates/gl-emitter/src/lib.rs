//! `gl-emitter` — one simulated participant's publish loop.
//!
//! # Send loop
//!
//! ```text
//! loop:
//!   ① Wait      — sample the next inter-arrival time, sleep for it
//!                 (wakes early at the shared deadline or on stop)
//!   ② Deadline  — past the deadline? stop before sending
//!   ③ Build     — sample a size, build a payload of exactly that size
//!   ④ Publish   — Publisher::send, timed
//!   ⑤ Record    — attempted / succeeded / failed / bytes / latency
//!                 unrecoverable error → stop; recoverable → continue
//! ```
//!
//! The network itself stays behind the [`Publisher`] trait.  Two in-process
//! implementations are provided: [`NullPublisher`] (dry run) and
//! [`ChannelPublisher`] (a bounded relay queue).

pub mod emitter;
pub mod payload;
pub mod publisher;
pub mod state;


pub use emitter::Emitter;
pub use payload::{HEADER_LEN, PayloadHeader, build_payload};
pub use publisher::{
    Ack, ChannelPublisher, NullPublisher, Publisher, PublisherFactory, RelayedMessage, SendError,
};
pub use state::{EmitterState, LatencyStats, MessageRecord, SendOutcome, StopReason};
