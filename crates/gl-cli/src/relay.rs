//! In-process relay queue drained by a counting task.

use std::collections::HashSet;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use gl_emitter::{PayloadHeader, RelayedMessage};

/// What reached the relay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub messages: u64,
    pub bytes:    u64,
    /// Distinct participants seen.
    pub senders:  usize,
}

/// A bounded relay queue and the task draining it.
///
/// The task ends once every sender is dropped, i.e. after the run has
/// released all its publishers.
pub fn spawn_relay(capacity: usize) -> (mpsc::Sender<RelayedMessage>, JoinHandle<RelayStats>) {
    let (tx, mut rx) = mpsc::channel::<RelayedMessage>(capacity.max(1));
    let drain = tokio::spawn(async move {
        let mut stats = RelayStats::default();
        let mut senders = HashSet::new();
        while let Some(msg) = rx.recv().await {
            stats.messages += 1;
            stats.bytes += msg.payload.len() as u64;
            senders.insert(msg.from);
            if let Some(header) = PayloadHeader::parse(&msg.payload) {
                trace!(from = %msg.from, seq = header.seq, size = msg.payload.len(), "relayed");
            }
        }
        stats.senders = senders.len();
        stats
    });
    (tx, drain)
}
