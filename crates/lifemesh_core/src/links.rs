use lifemesh_data::{Direction, PeerId};

/// Which peer, if any, sits on each side of this tile.
///
/// A peer may be bound to at most one side; the receive path relies on
/// that to route a packet to its cache entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    peers: [Option<PeerId>; 4],
}

impl Links {
    /// No links: the tile behaves as an isolated torus.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Binds `peer` to `direction`, replacing any previous binding on that
    /// side. Returns `false` and leaves the links untouched when the peer is
    /// already bound to a different side.
    pub fn bind(&mut self, direction: Direction, peer: PeerId) -> bool {
        if let Some(existing) = self.direction_of(&peer) {
            if existing != direction {
                return false;
            }
        }
        self.peers[direction.index()] = Some(peer);
        true
    }

    #[must_use]
    pub fn with(mut self, direction: Direction, peer: impl Into<PeerId>) -> Self {
        self.bind(direction, peer.into());
        self
    }

    #[must_use]
    pub fn peer(&self, direction: Direction) -> Option<&PeerId> {
        self.peers[direction.index()].as_ref()
    }

    #[must_use]
    pub fn is_linked(&self, direction: Direction) -> bool {
        self.peers[direction.index()].is_some()
    }

    #[must_use]
    pub fn direction_of(&self, peer: &PeerId) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| self.peers[d.index()].as_ref() == Some(peer))
    }

    /// Configured links in `Direction::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &PeerId)> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.peers[d.index()].as_ref().map(|p| (d, p)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
