//! Several tiles stitched east/west into a ring inside one process.

use std::sync::Arc;

use anyhow::Context;
use lifemesh_core::config::LinkConfig;
use lifemesh_core::{AppConfig, EdgeSnapshot, Frame, Renderer, TileStatus};
use lifemesh_data::{Direction, Grid};
use lifemesh_net::MemoryHub;

use crate::node::Node;
use crate::simulation::Simulation;

/// A horizontal ring of tiles sharing a [`MemoryHub`]. Tile `i` has tile
/// `i + 1` to its east, wrapping around, so together they cover one torus
/// `size` tiles wide.
pub struct Mesh {
    hub: MemoryHub,
    nodes: Vec<Node>,
    renderer: Renderer,
    frame: Frame,
}

impl Mesh {
    /// Smallest ring in which every tile has distinct east and west peers.
    pub const MIN_SIZE: usize = 3;

    /// Builds `size` tiles from `config`, each seeded from `config.seed`
    /// plus its index, and publishes every starting boundary so the first
    /// generation is already stitched.
    pub fn ring(config: &AppConfig, size: usize) -> anyhow::Result<Self> {
        anyhow::ensure!(
            size >= Self::MIN_SIZE,
            "A ring needs at least {} tiles",
            Self::MIN_SIZE
        );
        let hub = MemoryHub::new();
        let name = |i: usize| format!("{}-{i}", config.node.name);

        let mut nodes = Vec::with_capacity(size);
        for i in 0..size {
            let mut tile_config = config.clone();
            tile_config.seed = config.seed.map(|s| s.wrapping_add(i as u64));
            tile_config.node.name = name(i);
            tile_config.node.links = vec![
                LinkConfig {
                    direction: Direction::East,
                    peer: name((i + 1) % size),
                },
                LinkConfig {
                    direction: Direction::West,
                    peer: name((i + size - 1) % size),
                },
            ];

            let mut node = Node::new(&tile_config)
                .with_context(|| format!("building tile {i} of the ring"))?;
            hub.register(
                name(i),
                Arc::clone(node.edge_cache()),
                Arc::clone(node.metrics()),
            );
            node.set_transport(Box::new(hub.transport(name(i))));
            nodes.push(node);
        }

        for node in &nodes {
            node.export();
        }

        let renderer = Renderer::from(&config.render);
        let frame = Frame::new(0, 0);
        tracing::info!(size, "Mesh ring up");
        Ok(Self {
            hub,
            nodes,
            renderer,
            frame,
        })
    }

    #[must_use]
    pub fn hub(&self) -> &MemoryHub {
        &self.hub
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Every tile evolves against the boundaries of the previous
    /// generation before any tile exports its new ones.
    pub fn step(&mut self, thickness: usize) {
        for node in &mut self.nodes {
            node.evolve(thickness);
        }
        for node in &self.nodes {
            node.export();
        }
    }

    /// The tiles laid side by side, west to east.
    #[must_use]
    pub fn stitched(&self) -> Grid {
        let Some(first) = self.nodes.first() else {
            return Grid::new(0, 0);
        };
        let (w, h) = (first.tile().width(), first.tile().height());
        let mut grid = Grid::new(w * self.nodes.len(), h);
        for (i, node) in self.nodes.iter().enumerate() {
            for y in 0..h {
                grid.row_mut(y)[i * w..(i + 1) * w].copy_from_slice(node.tile().grid().row(y));
            }
        }
        grid
    }
}

impl Simulation for Mesh {
    fn step(&mut self, thickness: usize) {
        Mesh::step(self, thickness);
    }

    fn generation(&self) -> u64 {
        self.nodes.first().map_or(0, |n| n.tile().generation())
    }

    fn frame(&mut self) -> &Frame {
        let grid = self.stitched();
        if let Some(first) = self.nodes.first() {
            self.renderer.render(
                &grid,
                first.tile().lifetime(),
                &EdgeSnapshot::empty(),
                &mut self.frame,
            );
        }
        &self.frame
    }

    fn status(&self, thickness: usize) -> TileStatus {
        let mut status = self
            .nodes
            .first()
            .map(|n| n.status(thickness))
            .unwrap_or_default();
        status.name = format!("ring of {}", self.nodes.len());
        status.live_cells = self.nodes.iter().map(|n| n.tile().live_cells()).sum();
        status
    }

    fn summary(&self) -> serde_json::Value {
        let stats = self.hub.stats();
        serde_json::json!({
            "delivered": stats.delivered,
            "dropped": stats.dropped,
            "tiles": self.nodes.iter().map(Simulation::summary).collect::<Vec<_>>(),
        })
    }
}
