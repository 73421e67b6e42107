//! The `Publisher` capability, the engine's only view of the network.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use gl_core::ParticipantId;

/// Acknowledgement of a message accepted by the transport.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ack;

/// A failed publish, classified by whether the emitter may keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// Transient failure for this one message; the emitter continues.
    #[error("recoverable send failure: {0}")]
    Recoverable(String),

    /// The publisher is permanently unusable; the emitter stops.
    #[error("unrecoverable send failure: {0}")]
    Unrecoverable(String),
}

impl SendError {
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SendError::Recoverable(_))
    }
}

/// Hands one payload to the network transport.
///
/// Each emitter owns its publisher exclusively and never calls `send` again
/// before the previous call has returned.
#[async_trait]
pub trait Publisher: Send + 'static {
    async fn send(&mut self, payload: Bytes) -> Result<Ack, SendError>;
}

#[async_trait]
impl<P: Publisher + ?Sized> Publisher for Box<P> {
    async fn send(&mut self, payload: Bytes) -> Result<Ack, SendError> {
        (**self).send(payload).await
    }
}

/// Produces one [`Publisher`] per emitting participant.
///
/// A failure is charged to that participant only: its emitter is recorded as
/// stopped by an unrecoverable error and the rest of the run goes ahead.
///
/// Implemented for any `Fn(ParticipantId) -> Result<P, SendError>`.
pub trait PublisherFactory: Send + Sync + 'static {
    type Publisher: Publisher;

    fn create(&self, participant: ParticipantId) -> Result<Self::Publisher, SendError>;
}

impl<F, P> PublisherFactory for F
where
    F: Fn(ParticipantId) -> Result<P, SendError> + Send + Sync + 'static,
    P: Publisher,
{
    type Publisher = P;

    fn create(&self, participant: ParticipantId) -> Result<P, SendError> {
        self(participant)
    }
}

// ── NullPublisher ─────────────────────────────────────────────────────────────

/// Accepts and drops every payload.  Useful for dry runs and tests.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullPublisher;

impl NullPublisher {
    pub fn factory() -> impl PublisherFactory<Publisher = NullPublisher> {
        |_participant: ParticipantId| -> Result<NullPublisher, SendError> { Ok(NullPublisher) }
    }
}

#[async_trait]
impl Publisher for NullPublisher {
    async fn send(&mut self, _payload: Bytes) -> Result<Ack, SendError> {
        Ok(Ack)
    }
}

// ── ChannelPublisher ──────────────────────────────────────────────────────────

/// A message handed to the local relay queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayedMessage {
    pub from:    ParticipantId,
    pub payload: Bytes,
}

/// Publishes into a bounded tokio channel standing in for a node's relay
/// queue.
///
/// A full queue is a recoverable failure (the message is dropped); a closed
/// queue means the node is gone and is unrecoverable.
#[derive(Clone, Debug)]
pub struct ChannelPublisher {
    participant: ParticipantId,
    tx:          mpsc::Sender<RelayedMessage>,
}

impl ChannelPublisher {
    pub fn new(participant: ParticipantId, tx: mpsc::Sender<RelayedMessage>) -> Self {
        Self { participant, tx }
    }

    /// A factory handing every participant a clone of `tx`.
    pub fn factory(
        tx: mpsc::Sender<RelayedMessage>,
    ) -> impl PublisherFactory<Publisher = ChannelPublisher> {
        move |participant: ParticipantId| -> Result<ChannelPublisher, SendError> {
            if tx.is_closed() {
                return Err(SendError::Unrecoverable("relay queue closed".into()));
            }
            Ok(ChannelPublisher::new(participant, tx.clone()))
        }
    }
}

#[async_trait]
impl Publisher for ChannelPublisher {
    async fn send(&mut self, payload: Bytes) -> Result<Ack, SendError> {
        let message = RelayedMessage { from: self.participant, payload };
        match self.tx.try_send(message) {
            Ok(()) => Ok(Ack),
            Err(TrySendError::Full(_)) => Err(SendError::Recoverable("relay queue full".into())),
            Err(TrySendError::Closed(_)) => {
                Err(SendError::Unrecoverable("relay queue closed".into()))
            }
        }
    }
}
