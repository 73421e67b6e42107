//! Strongly typed participant identifier.
//!
//! Participants are numbered `0..participants` by the coordinator.  The inner
//! integer is `pub` so it can double as a `Vec` index via `id.0 as usize`, but
//! callers should prefer [`ParticipantId::index`] for clarity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a simulated participant.  Max ~4.3 billion participants.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u32);

impl ParticipantId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParticipantId({})", self.0)
    }
}

impl From<ParticipantId> for usize {
    #[inline(always)]
    fn from(id: ParticipantId) -> usize {
        id.0 as usize
    }
}

impl TryFrom<usize> for ParticipantId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<ParticipantId, Self::Error> {
        u32::try_from(n).map(ParticipantId)
    }
}
