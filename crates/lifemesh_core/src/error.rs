//! Error types for the boundary exchange.
//!
//! None of these are fatal to the tick loop: a rejected packet leaves the
//! cache as it was and a failed send is simply not retried.

use lifemesh_data::{DataError, Direction, PeerId};
use thiserror::Error;

/// Reasons an inbound boundary packet was not applied to the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EdgeError {
    /// Payload shorter than label plus boundary vector
    #[error("malformed boundary packet from {peer}: {source}")]
    Malformed {
        peer: PeerId,
        #[source]
        source: DataError,
    },

    /// Sender is not bound to any configured direction
    #[error("packet from unrecognized peer {0}")]
    UnknownPeer(PeerId),
}

/// Failures reported by a [`crate::Transport`].
#[derive(Error, Debug)]
pub enum TransportError {
    /// The datagram could not be handed to the network
    #[error("send to {peer} ({direction}) failed: {reason}")]
    Send {
        peer: PeerId,
        direction: Direction,
        reason: String,
    },

    /// Peer identity could not be resolved to a transport address
    #[error("unknown destination {0}")]
    UnknownDestination(PeerId),

    /// Transport could not be brought up
    #[error("transport initialization failed: {0}")]
    Init(#[from] std::io::Error),
}

impl TransportError {
    /// Creates a send error for the given peer and side.
    #[must_use]
    pub fn send<S: Into<String>>(peer: &PeerId, direction: Direction, reason: S) -> Self {
        Self::Send {
            peer: peer.clone(),
            direction,
            reason: reason.into(),
        }
    }
}
