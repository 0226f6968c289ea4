//! Client fan-out bus.
//!
//! Uses a [`tokio::sync::broadcast`] channel so every connection task
//! receives every frame without any single slow client blocking the others.
//! Each frame carries the id of the client that caused it; that client's
//! connection task skips the frame, which is how "broadcast to everyone
//! except the sender" is implemented without per-client bookkeeping.

use roverlink_types::ServerEvent;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Buffered frames per subscriber before old ones are dropped for slow
/// clients.
const DEFAULT_CAPACITY: usize = 256;

/// A frame travelling from the relay to connected clients.
#[derive(Debug, Clone)]
pub struct Outbound {
    /// Client whose message caused this broadcast. Its own connection task
    /// drops the frame so a sender never hears its own event.
    pub origin: Option<Uuid>,
    pub event: ServerEvent,
}

/// Shared fan-out bus. Clone it cheaply – all clones share the same
/// underlying broadcast channel.
#[derive(Clone, Debug)]
pub struct RelayBus {
    sender: broadcast::Sender<Outbound>,
}

impl RelayBus {
    /// Create a bus with the given per-subscriber buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Broadcast `event` to every connection except `origin`'s own.
    ///
    /// Returns the number of connection tasks handed the frame (including
    /// the origin's, which will drop it). Zero receivers is a normal
    /// condition – a lone client sending AI triggers has no peers.
    pub fn publish_from(&self, origin: Uuid, event: ServerEvent) -> usize {
        self.sender
            .send(Outbound {
                origin: Some(origin),
                event,
            })
            .unwrap_or(0)
    }

    /// Subscribe a new connection task to the fan-out stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Outbound> {
        self.sender.subscribe()
    }
}

impl Default for RelayBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
