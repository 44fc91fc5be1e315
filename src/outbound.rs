//! Outbound message queue
//!
//! A single bounded FIFO channel decouples state mutations (any thread) from
//! the link writer. The receiver lives in the link manager and persists
//! across reconnects, so messages enqueued while disconnected are delivered
//! once a session comes back up, in enqueue order.
//!
//! The queue is bounded; when full the new message is dropped with a warning
//! instead of blocking the caller. The DAW pushes fresh state on its next
//! update, so dropped messages are not replayed.

use crate::constants::OUTBOUND_QUEUE_CAPACITY;
use crate::protocol::OutboundMessage;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Receiving end of the outbound queue, owned by the link manager
pub type OutboundReceiver = mpsc::Receiver<OutboundMessage>;

/// Create the outbound queue
pub fn channel() -> (OutboundSender, OutboundReceiver) {
    let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
    (OutboundSender { tx }, rx)
}

/// Clonable producer handle, callable from sync (UI-thread) contexts
#[derive(Clone)]
pub struct OutboundSender {
    tx: mpsc::Sender<OutboundMessage>,
}

impl OutboundSender {
    /// Enqueue a message, never blocking
    pub fn send(&self, message: OutboundMessage) {
        match self.tx.try_send(message) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(message)) => {
                warn!("outbound queue full, dropping {}", message.to_line());
            }
            Err(mpsc::error::TrySendError::Closed(message)) => {
                // Link manager is gone (shutdown); nothing left to deliver to
                debug!("outbound queue closed, dropping {}", message.to_line());
            }
        }
    }
}
