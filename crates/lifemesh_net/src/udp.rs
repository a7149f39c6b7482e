use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use lifemesh_core::{EdgeCache, Links, Metrics, Transport, TransportError};
use lifemesh_data::{Direction, PeerId};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// Largest payload a single UDP datagram can carry.
const MAX_DATAGRAM: usize = 65_507;

#[derive(Debug, Clone, Copy)]
struct Route {
    direction: Direction,
    target: SocketAddr,
}

/// One UDP socket shared by the send path and the receive task.
#[derive(Debug)]
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    routes: HashMap<PeerId, Route>,
    origins: Arc<HashMap<SocketAddr, PeerId>>,
}

impl UdpTransport {
    /// Binds `addr` and resolves every linked peer. A peer that does not
    /// resolve is logged and left unroutable; sends to it fail.
    pub async fn bind(addr: &str, links: &Links) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(addr).await?;
        // try_send_to would block until the reactor has polled the socket once
        socket.writable().await?;
        let mut routes = HashMap::new();
        let mut origins = HashMap::new();

        for (direction, peer) in links.iter() {
            match resolve(peer).await {
                Ok(target) => {
                    tracing::debug!(%peer, %direction, %target, "peer resolved");
                    routes.insert(peer.clone(), Route { direction, target });
                    origins.insert(target, peer.clone());
                }
                Err(e) => {
                    tracing::warn!(%peer, %direction, error = %e, "peer address does not resolve");
                }
            }
        }

        tracing::info!(local = %socket.local_addr()?, peers = routes.len(), "UDP transport up");
        Ok(Self {
            socket: Arc::new(socket),
            routes,
            origins: Arc::new(origins),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Peer identity for a source address. Unconfigured senders keep their
    /// raw address so the cache can reject them by name.
    #[must_use]
    pub fn peer_for(&self, from: SocketAddr) -> PeerId {
        origin_peer(&self.origins, from)
    }

    /// Runs the receive loop until the returned task is aborted. Each
    /// datagram is handed to the cache as soon as it arrives.
    pub fn spawn_receiver(&self, cache: Arc<EdgeCache>, metrics: Arc<Metrics>) -> JoinHandle<()> {
        let socket = Arc::clone(&self.socket);
        let origins = Arc::clone(&self.origins);
        tokio::spawn(async move {
            let mut buf = vec![0u8; MAX_DATAGRAM];
            loop {
                match socket.recv_from(&mut buf).await {
                    Ok((len, from)) => {
                        let peer = origin_peer(&origins, from);
                        cache.accept(&peer, &buf[..len], &metrics);
                    }
                    Err(e) => {
                        // ICMP port-unreachable from an absent peer lands here
                        tracing::debug!(error = %e, "recv failed");
                    }
                }
            }
        })
    }
}

impl Transport for UdpTransport {
    fn send(&self, peer: &PeerId, bytes: &[u8]) -> Result<(), TransportError> {
        let route = self
            .routes
            .get(peer)
            .ok_or_else(|| TransportError::UnknownDestination(peer.clone()))?;
        self.socket
            .try_send_to(bytes, route.target)
            .map(|_| ())
            .map_err(|e| TransportError::send(peer, route.direction, e.to_string()))
    }
}

fn origin_peer(origins: &HashMap<SocketAddr, PeerId>, from: SocketAddr) -> PeerId {
    origins
        .get(&from)
        .cloned()
        .unwrap_or_else(|| PeerId::from(from))
}

async fn resolve(peer: &PeerId) -> io::Result<SocketAddr> {
    if let Ok(addr) = peer.as_str().parse::<SocketAddr>() {
        return Ok(addr);
    }
    tokio::net::lookup_host(peer.as_str())
        .await?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no address"))
}
