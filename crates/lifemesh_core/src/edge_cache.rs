//! Cache of the most recent boundary received from each neighbor.
//!
//! The receive path is the only writer; the tick loop reads the cache once
//! per generation through [`EdgeCache::snapshot`]. Each side is guarded by
//! its own lock so a packet for one side never waits on another.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use lifemesh_data::{BoundaryDatagram, Cell, Direction, Lifetime, PeerId};
use serde::{Deserialize, Serialize};

use crate::error::EdgeError;
use crate::links::Links;
use crate::metrics::Metrics;

/// How long a received boundary stays trustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalenessPolicy {
    /// Trust the last boundary forever once one has arrived.
    #[default]
    LastKnownGood,
    /// Fall back to local wrap when nothing arrived for this many milliseconds.
    ExpireAfterMs(u64),
}

impl StalenessPolicy {
    #[must_use]
    pub fn max_age(self) -> Option<Duration> {
        match self {
            StalenessPolicy::LastKnownGood => None,
            StalenessPolicy::ExpireAfterMs(ms) => Some(Duration::from_millis(ms)),
        }
    }
}

/// Last boundary received for one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeEntry {
    pub data: Vec<Cell>,
    /// Set by the first accepted packet and never cleared.
    pub valid: bool,
    pub last_received: Option<Instant>,
    /// Label carried by the last accepted packet.
    pub sender: String,
}

impl EdgeEntry {
    fn empty(len: usize) -> Self {
        Self {
            data: vec![Lifetime::DEAD; len],
            valid: false,
            last_received: None,
            sender: String::new(),
        }
    }

    /// Valid and, under an expiring policy, recent enough.
    #[must_use]
    pub fn is_fresh(&self, policy: StalenessPolicy, now: Instant) -> bool {
        if !self.valid {
            return false;
        }
        match (policy.max_age(), self.last_received) {
            (None, _) => true,
            (Some(max_age), Some(at)) => now.saturating_duration_since(at) <= max_age,
            (Some(_), None) => false,
        }
    }
}

/// Per-direction boundary store shared by the tick and receive contexts.
#[derive(Debug)]
pub struct EdgeCache {
    links: Links,
    lifetime: Lifetime,
    width: usize,
    height: usize,
    policy: StalenessPolicy,
    entries: [Mutex<EdgeEntry>; 4],
}

impl EdgeCache {
    /// Creates an invalid, zero-filled entry for every side of a
    /// `width × height` tile.
    #[must_use]
    pub fn new(
        width: usize,
        height: usize,
        lifetime: Lifetime,
        links: Links,
        policy: StalenessPolicy,
    ) -> Self {
        let entries =
            Direction::ALL.map(|d| Mutex::new(EdgeEntry::empty(d.boundary_len(width, height))));
        Self {
            links,
            lifetime,
            width,
            height,
            policy,
            entries,
        }
    }

    #[must_use]
    pub fn links(&self) -> &Links {
        &self.links
    }

    #[must_use]
    pub fn policy(&self) -> StalenessPolicy {
        self.policy
    }

    /// Expected number of cells in a boundary arriving on `direction`.
    #[must_use]
    pub fn boundary_len(&self, direction: Direction) -> usize {
        direction.boundary_len(self.width, self.height)
    }

    /// Receive callback: routes `payload` from `peer` into the matching
    /// side. On error the cache is left untouched.
    pub fn on_receive(&self, peer: &PeerId, payload: &[u8]) -> Result<Direction, EdgeError> {
        self.on_receive_at(peer, payload, Instant::now())
    }

    pub fn on_receive_at(
        &self,
        peer: &PeerId,
        payload: &[u8],
        now: Instant,
    ) -> Result<Direction, EdgeError> {
        let direction = self
            .links
            .direction_of(peer)
            .ok_or_else(|| EdgeError::UnknownPeer(peer.clone()))?;

        let datagram = BoundaryDatagram::decode(payload, self.boundary_len(direction))
            .map_err(|source| EdgeError::Malformed {
                peer: peer.clone(),
                source,
            })?;

        let mut entry = self.lock(direction);
        entry.sender.clear();
        entry.sender.push_str(datagram.label());
        for (dst, &src) in entry.data.iter_mut().zip(datagram.data()) {
            *dst = self.lifetime.clamp(src);
        }
        entry.valid = true;
        entry.last_received = Some(now);

        tracing::trace!(%peer, %direction, label = datagram.label(), "boundary accepted");
        Ok(direction)
    }

    /// [`EdgeCache::on_receive`] with diagnostics: rejections are logged and
    /// counted, never propagated.
    pub fn accept(&self, peer: &PeerId, payload: &[u8], metrics: &Metrics) -> Option<Direction> {
        match self.on_receive(peer, payload) {
            Ok(direction) => {
                metrics.record_accepted();
                Some(direction)
            }
            Err(EdgeError::UnknownPeer(peer)) => {
                metrics.record_unknown_peer();
                tracing::warn!(%peer, len = payload.len(), "ignoring packet from unrecognized peer");
                None
            }
            Err(e) => {
                metrics.record_malformed();
                tracing::warn!(error = %e, "rejected boundary packet");
                None
            }
        }
    }

    /// Copy of one side's entry.
    #[must_use]
    pub fn entry(&self, direction: Direction) -> EdgeEntry {
        self.lock(direction).clone()
    }

    /// Fresh boundaries for every linked side, taken at the start of a
    /// generation so the whole generation sees one consistent view.
    #[must_use]
    pub fn snapshot(&self) -> EdgeSnapshot {
        self.snapshot_at(Instant::now())
    }

    #[must_use]
    pub fn snapshot_at(&self, now: Instant) -> EdgeSnapshot {
        let mut snapshot = EdgeSnapshot::empty();
        for (direction, _) in self.links.iter() {
            let entry = self.lock(direction);
            if entry.is_fresh(self.policy, now) {
                snapshot.edges[direction.index()] = Some(entry.data.clone());
            }
        }
        snapshot
    }

    fn lock(&self, direction: Direction) -> std::sync::MutexGuard<'_, EdgeEntry> {
        self.entries[direction.index()]
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}

/// Immutable per-generation view of the neighbor boundaries that may be
/// stitched in. A side is `None` when it has no link or no fresh data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSnapshot {
    edges: [Option<Vec<Cell>>; 4],
}

impl EdgeSnapshot {
    /// Nothing to stitch: pure local wraparound.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, direction: Direction, boundary: Vec<Cell>) -> Self {
        self.edges[direction.index()] = Some(boundary);
        self
    }

    #[inline]
    #[must_use]
    pub fn get(&self, direction: Direction) -> Option<&[Cell]> {
        self.edges[direction.index()].as_deref()
    }

    #[must_use]
    pub fn fresh_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.edges[d.index()].is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(policy: StalenessPolicy) -> EdgeCache {
        let links = Links::none()
            .with(Direction::East, "east-peer")
            .with(Direction::North, "north-peer");
        EdgeCache::new(4, 3, Lifetime::default(), links, policy)
    }

    #[test]
    fn test_entries_start_invalid_and_zeroed() {
        let cache = cache(StalenessPolicy::LastKnownGood);
        let entry = cache.entry(Direction::East);
        assert!(!entry.valid);
        assert_eq!(entry.data, vec![0, 0, 0]);
        assert!(entry.last_received.is_none());
        assert_eq!(cache.entry(Direction::North).data.len(), 4);
        assert_eq!(cache.snapshot(), EdgeSnapshot::empty());
    }

    #[test]
    fn test_receive_routes_by_peer() {
        let cache = cache(StalenessPolicy::LastKnownGood);
        let payload = BoundaryDatagram::new("b", vec![6, 1, 0]).encode();
        let dir = cache.on_receive(&PeerId::new("east-peer"), &payload).unwrap();
        assert_eq!(dir, Direction::East);

        let entry = cache.entry(Direction::East);
        assert!(entry.valid);
        assert_eq!(entry.data, vec![6, 1, 0]);
        assert_eq!(entry.sender, "b");
        assert_eq!(cache.snapshot().get(Direction::East), Some(&[6, 1, 0][..]));
        assert_eq!(cache.snapshot().get(Direction::North), None);
    }

    #[test]
    fn test_unknown_peer_is_ignored() {
        let cache = cache(StalenessPolicy::LastKnownGood);
        let payload = BoundaryDatagram::new("x", vec![6, 6, 6]).encode();
        let err = cache.on_receive(&PeerId::new("stranger"), &payload).unwrap_err();
        assert_eq!(err, EdgeError::UnknownPeer(PeerId::new("stranger")));
        for d in Direction::ALL {
            assert!(!cache.entry(d).valid);
        }
    }

    #[test]
    fn test_short_payload_preserves_entry() {
        let cache = cache(StalenessPolicy::LastKnownGood);
        let peer = PeerId::new("east-peer");
        cache
            .on_receive(&peer, &BoundaryDatagram::new("b", vec![1, 2, 3]).encode())
            .unwrap();
        let before = cache.entry(Direction::East);

        let short = BoundaryDatagram::new("b", vec![6, 6]).encode();
        let err = cache.on_receive(&peer, &short).unwrap_err();
        assert!(matches!(err, EdgeError::Malformed { .. }));
        assert_eq!(cache.entry(Direction::East), before);
    }

    #[test]
    fn test_accept_counts_outcomes() {
        let cache = cache(StalenessPolicy::LastKnownGood);
        let metrics = Metrics::new();
        let good = BoundaryDatagram::new("b", vec![6, 6, 6]).encode();
        assert_eq!(
            cache.accept(&PeerId::new("east-peer"), &good, &metrics),
            Some(Direction::East)
        );
        assert_eq!(cache.accept(&PeerId::new("east-peer"), &good[..5], &metrics), None);
        assert_eq!(cache.accept(&PeerId::new("nobody"), &good, &metrics), None);

        let snap = metrics.snapshot();
        assert_eq!(snap.packets_accepted, 1);
        assert_eq!(snap.packets_malformed, 1);
        assert_eq!(snap.packets_unknown_peer, 1);
    }

    #[test]
    fn test_out_of_domain_cells_are_clamped() {
        let cache = cache(StalenessPolicy::LastKnownGood);
        let payload = BoundaryDatagram::new("b", vec![200, 6, 3]).encode();
        cache.on_receive(&PeerId::new("east-peer"), &payload).unwrap();
        assert_eq!(cache.entry(Direction::East).data, vec![6, 6, 3]);
    }

    #[test]
    fn test_last_known_good_never_expires() {
        let cache = cache(StalenessPolicy::LastKnownGood);
        let t0 = Instant::now();
        let payload = BoundaryDatagram::new("b", vec![6, 6, 6]).encode();
        cache
            .on_receive_at(&PeerId::new("east-peer"), &payload, t0)
            .unwrap();
        let later = t0 + Duration::from_secs(3600);
        assert!(cache.snapshot_at(later).get(Direction::East).is_some());
    }

    #[test]
    fn test_expiring_policy_falls_back_and_recovers() {
        let cache = cache(StalenessPolicy::ExpireAfterMs(500));
        let peer = PeerId::new("east-peer");
        let payload = BoundaryDatagram::new("b", vec![6, 6, 6]).encode();
        let t0 = Instant::now();
        cache.on_receive_at(&peer, &payload, t0).unwrap();

        assert!(cache
            .snapshot_at(t0 + Duration::from_millis(400))
            .get(Direction::East)
            .is_some());
        let stale = t0 + Duration::from_millis(900);
        assert!(cache.snapshot_at(stale).get(Direction::East).is_none());
        // validity itself is sticky
        assert!(cache.entry(Direction::East).valid);

        cache.on_receive_at(&peer, &payload, stale).unwrap();
        assert!(cache.snapshot_at(stale).get(Direction::East).is_some());
    }

    #[test]
    fn test_policy_parses_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            staleness: StalenessPolicy,
        }
        let w: Wrapper = toml::from_str("staleness = \"last-known-good\"").unwrap();
        assert_eq!(w.staleness, StalenessPolicy::LastKnownGood);
        let w: Wrapper = toml::from_str("staleness = { expire-after-ms = 250 }").unwrap();
        assert_eq!(w.staleness, StalenessPolicy::ExpireAfterMs(250));
    }
}
