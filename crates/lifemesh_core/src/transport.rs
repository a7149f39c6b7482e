use lifemesh_data::PeerId;

use crate::error::TransportError;

/// Best-effort datagram sender: unordered, unacknowledged, no retries.
///
/// Implementations must not block the tick loop. Received datagrams are
/// delivered out of band into an [`crate::EdgeCache`].
pub trait Transport: Send + Sync {
    fn send(&self, peer: &PeerId, bytes: &[u8]) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, peer: &PeerId, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).send(peer, bytes)
    }
}
