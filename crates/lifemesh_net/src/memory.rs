use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use lifemesh_core::{EdgeCache, Metrics, Transport, TransportError};
use lifemesh_data::PeerId;

type LossFn = Box<dyn FnMut(&PeerId, &PeerId) -> bool + Send>;

/// Delivery counters for a [`MemoryHub`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubStats {
    pub delivered: u64,
    pub dropped: u64,
}

struct Endpoint {
    cache: Arc<EdgeCache>,
    metrics: Arc<Metrics>,
}

#[derive(Default)]
struct HubInner {
    endpoints: HashMap<PeerId, Endpoint>,
    loss: Option<LossFn>,
    stats: HubStats,
}

/// Connects tiles living in one process. A send is delivered into the
/// destination's cache before `send` returns, unless the loss predicate
/// drops it.
#[derive(Clone, Default)]
pub struct MemoryHub {
    inner: Arc<Mutex<HubInner>>,
}

impl std::fmt::Debug for MemoryHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("MemoryHub")
            .field("endpoints", &inner.endpoints.len())
            .field("lossy", &inner.loss.is_some())
            .field("stats", &inner.stats)
            .finish()
    }
}

impl MemoryHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `id` reachable. Packets sent to it land in `cache`.
    pub fn register(&self, id: impl Into<PeerId>, cache: Arc<EdgeCache>, metrics: Arc<Metrics>) {
        let id = id.into();
        tracing::debug!(peer = %id, "endpoint registered");
        self.lock().endpoints.insert(id, Endpoint { cache, metrics });
    }

    /// The sending half for the tile registered as `from`.
    #[must_use]
    pub fn transport(&self, from: impl Into<PeerId>) -> MemoryTransport {
        MemoryTransport {
            hub: self.clone(),
            from: from.into(),
        }
    }

    /// Installs a predicate consulted for every packet; `true` drops it.
    pub fn set_loss<F>(&self, loss: F)
    where
        F: FnMut(&PeerId, &PeerId) -> bool + Send + 'static,
    {
        self.lock().loss = Some(Box::new(loss));
    }

    pub fn clear_loss(&self) {
        self.lock().loss = None;
    }

    #[must_use]
    pub fn stats(&self) -> HubStats {
        self.lock().stats
    }

    fn deliver(&self, from: &PeerId, to: &PeerId, bytes: &[u8]) -> Result<(), TransportError> {
        let (cache, metrics) = {
            let mut inner = self.lock();
            let inner = &mut *inner;
            let endpoint = inner
                .endpoints
                .get(to)
                .ok_or_else(|| TransportError::UnknownDestination(to.clone()))?;
            let (cache, metrics) = (Arc::clone(&endpoint.cache), Arc::clone(&endpoint.metrics));

            if inner.loss.as_mut().is_some_and(|lose| lose(from, to)) {
                inner.stats.dropped += 1;
                tracing::trace!(%from, %to, "packet dropped");
                return Ok(());
            }
            inner.stats.delivered += 1;
            (cache, metrics)
        };

        cache.accept(from, bytes, &metrics);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Sending half bound to one tile's identity.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    hub: MemoryHub,
    from: PeerId,
}

impl MemoryTransport {
    #[must_use]
    pub fn id(&self) -> &PeerId {
        &self.from
    }
}

impl Transport for MemoryTransport {
    fn send(&self, peer: &PeerId, bytes: &[u8]) -> Result<(), TransportError> {
        self.hub.deliver(&self.from, peer, bytes)
    }
}
