//! Synthetic payload construction.
//!
//! # Layout
//!
//! ```text
//! 0        8                 16                         size
//! ┌────────┬─────────────────┬──────────────────────────┐
//! │ seq    │ sent_at (ns)    │ random filler            │
//! │ u64 BE │ u64 BE, Unix    │ from the emitter's RNG   │
//! └────────┴─────────────────┴──────────────────────────┘
//! ```
//!
//! The header lets an analysis layer match received messages back to the
//! emitter's records and compute end-to-end delay.  Payloads shorter than
//! [`HEADER_LEN`] carry a truncated header prefix; the length of the result
//! always equals the requested size.

use bytes::{Bytes, BytesMut};

use gl_core::EmitterRng;

/// Bytes taken by the sequence number and timestamp.
pub const HEADER_LEN: usize = 16;

/// Decoded header of a full-length payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PayloadHeader {
    pub seq:                u64,
    pub sent_at_unix_nanos: u64,
}

impl PayloadHeader {
    /// Decode the header, or `None` if `payload` is shorter than [`HEADER_LEN`].
    pub fn parse(payload: &[u8]) -> Option<Self> {
        let seq = payload.get(0..8)?.try_into().ok()?;
        let ts = payload.get(8..HEADER_LEN)?.try_into().ok()?;
        Some(PayloadHeader {
            seq:                u64::from_be_bytes(seq),
            sent_at_unix_nanos: u64::from_be_bytes(ts),
        })
    }

    fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..8].copy_from_slice(&self.seq.to_be_bytes());
        out[8..].copy_from_slice(&self.sent_at_unix_nanos.to_be_bytes());
        out
    }
}

/// Build a payload of exactly `size` bytes.
pub fn build_payload(rng: &mut EmitterRng, header: PayloadHeader, size: usize) -> Bytes {
    let mut buf = BytesMut::zeroed(size);
    let head = header.to_bytes();
    let split = size.min(HEADER_LEN);
    buf[..split].copy_from_slice(&head[..split]);
    rng.fill(&mut buf[split..]);
    buf.freeze()
}

/// Current wall-clock time for the payload header.
pub(crate) fn unix_nanos_now() -> u64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .map_or(0, |ns| ns.max(0) as u64)
}
