//! One tile of the mesh together with everything it owns: the grid, the
//! inbound edge cache, the outbound exporter and the transport.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use lifemesh_core::{
    AppConfig, EdgeCache, EdgeExporter, ExportReport, Frame, Metrics, Renderer, Tile,
    TileStatus, Transport,
};
use lifemesh_net::UdpTransport;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::task::JoinHandle;

use crate::simulation::Simulation;

/// What one call to [`Node::tick`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub generation: u64,
    pub live_cells: usize,
    /// Rows reseeded by the perturbation band.
    pub perturbed: std::ops::Range<usize>,
    pub export: ExportReport,
}

pub struct Node {
    tile: Tile,
    cache: Arc<EdgeCache>,
    exporter: EdgeExporter,
    transport: Option<Box<dyn Transport>>,
    metrics: Arc<Metrics>,
    rng: ChaCha8Rng,
    renderer: Renderer,
    frame: Frame,
    fingerprint: String,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.exporter.label())
            .field("generation", &self.tile.generation())
            .field("links", self.cache.links())
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

impl Node {
    /// Builds an isolated node with a randomized grid. Attach a transport
    /// with [`Node::set_transport`] to start exchanging boundaries.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        config.validate().context("Invalid node configuration")?;
        let rules = config.rules()?;
        let links = config.links()?;
        let lifetime = config.grid.lifetime;
        let (width, height) = (config.grid.width, config.grid.height);

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut tile = Tile::new(width, height, rules, lifetime);
        tile.randomize(&mut rng);

        let cache = Arc::new(EdgeCache::new(
            width,
            height,
            lifetime,
            links,
            config.node.staleness,
        ));
        let renderer = Renderer::from(&config.render);
        let frame = renderer.frame_for(tile.grid());

        tracing::info!(
            name = %config.node.name,
            width,
            height,
            rules = %rules,
            lifetime = lifetime.states(),
            links = cache.links().len(),
            fingerprint = %config.fingerprint(),
            "Node created"
        );

        Ok(Self {
            tile,
            cache,
            exporter: EdgeExporter::new(config.node.name.as_str()),
            transport: None,
            metrics: Arc::new(Metrics::with_log_interval(config.metrics.log_interval)),
            rng,
            renderer,
            frame,
            fingerprint: config.fingerprint(),
        })
    }

    pub fn set_transport(&mut self, transport: Box<dyn Transport>) {
        self.transport = Some(transport);
    }

    #[must_use]
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.set_transport(Box::new(transport));
        self
    }

    #[must_use]
    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    /// Binds a UDP transport on `bind` and starts its receive task. When
    /// there are no links or the bind fails the node stays isolated and
    /// keeps wrapping locally.
    pub async fn attach_udp(&mut self, bind: &str) -> Option<JoinHandle<()>> {
        if self.cache.links().is_empty() {
            tracing::info!("No links configured, running isolated");
            return None;
        }
        match UdpTransport::bind(bind, self.cache.links()).await {
            Ok(transport) => {
                let receiver =
                    transport.spawn_receiver(Arc::clone(&self.cache), Arc::clone(&self.metrics));
                self.set_transport(Box::new(transport));
                Some(receiver)
            }
            Err(e) => {
                tracing::warn!(%bind, error = %e, "Transport unavailable, running isolated");
                None
            }
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.exporter.label()
    }

    #[must_use]
    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    pub fn tile_mut(&mut self) -> &mut Tile {
        &mut self.tile
    }

    /// Shared with the receive path.
    #[must_use]
    pub fn edge_cache(&self) -> &Arc<EdgeCache> {
        &self.cache
    }

    /// Shared with the receive path.
    #[must_use]
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Evolves one generation against a fresh edge snapshot, then reseeds
    /// `thickness` rows either side of the middle.
    pub fn evolve(&mut self, thickness: usize) -> std::ops::Range<usize> {
        let start = Instant::now();
        let edges = self.cache.snapshot();
        self.tile.advance(&edges);
        let perturbed = self.tile.perturb(thickness, &mut self.rng);
        self.metrics
            .record_generation(start.elapsed(), self.tile.live_cells());
        perturbed
    }

    /// Sends the committed boundaries to every linked peer. Without a
    /// transport this is a no-op.
    pub fn export(&self) -> ExportReport {
        match &self.transport {
            Some(transport) => self.exporter.export(
                self.tile.grid(),
                self.cache.links(),
                transport.as_ref(),
                &self.metrics,
            ),
            None => ExportReport::default(),
        }
    }

    /// One full generation: evolve, perturb, export.
    pub fn tick(&mut self, thickness: usize) -> TickReport {
        let perturbed = self.evolve(thickness);
        let export = self.export();
        TickReport {
            generation: self.tile.generation(),
            live_cells: self.tile.live_cells(),
            perturbed,
            export,
        }
    }

    /// Draws the committed grid with the current edge snapshot.
    pub fn render(&mut self) -> &Frame {
        let edges = self.cache.snapshot();
        self.renderer.render(
            self.tile.grid(),
            self.tile.lifetime(),
            &edges,
            &mut self.frame,
        );
        &self.frame
    }

    #[must_use]
    pub fn status(&self, thickness: usize) -> TileStatus {
        TileStatus {
            name: self.name().to_string(),
            generation: self.tile.generation(),
            live_cells: self.tile.live_cells(),
            fresh_links: self.cache.snapshot().fresh_directions(),
            linked: self.cache.links().len(),
            thickness,
            rules: self.tile.rules().notation(),
            fingerprint: self.fingerprint.clone(),
        }
    }
}

impl Simulation for Node {
    fn step(&mut self, thickness: usize) {
        self.tick(thickness);
    }

    fn generation(&self) -> u64 {
        self.tile.generation()
    }

    fn frame(&mut self) -> &Frame {
        self.render()
    }

    fn status(&self, thickness: usize) -> TileStatus {
        Node::status(self, thickness)
    }

    fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name(),
            "fingerprint": self.fingerprint,
            "metrics": self.metrics.snapshot(),
        })
    }
}
