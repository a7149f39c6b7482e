//! Cell-to-pixel mapping and the display seam.
//!
//! Each cell becomes a `cell_size_x × cell_size_y` block whose intensity is
//! proportional to its state, so decaying cells fade out over `L-1`
//! generations.

use async_trait::async_trait;
use lifemesh_data::{Cell, Direction, Grid, Lifetime};
use serde::Serialize;

use crate::config::RenderConfig;
use crate::edge_cache::EdgeSnapshot;

/// Row-major pixel intensities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Frame {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    #[must_use]
    pub fn line(&self, y: usize) -> &[u8] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    fn set(&mut self, x: usize, y: usize, value: u8) {
        self.pixels[y * self.width + x] = value;
    }
}

/// What a sink shows next to the picture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TileStatus {
    pub name: String,
    pub generation: u64,
    pub live_cells: usize,
    pub fresh_links: Vec<Direction>,
    pub linked: usize,
    pub thickness: usize,
    pub rules: String,
    pub fingerprint: String,
}

/// Requests coming back from an interactive sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    Quit,
    /// Turn the perturbation knob by this many notches.
    TurnKnob(i32),
}

/// A display with frame pacing.
#[async_trait]
pub trait FrameSink: Send {
    fn present(&mut self, frame: &Frame, status: &TileStatus) -> anyhow::Result<()>;

    /// Resolves when the next frame slot opens.
    async fn wait_for_frame(&mut self);

    /// Drains pending user input.
    fn poll_events(&mut self) -> anyhow::Result<Vec<SinkEvent>> {
        Ok(Vec::new())
    }

    /// Releases the display. Called once when the run loop ends.
    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Maps grids onto frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    pub cell_size_x: usize,
    pub cell_size_y: usize,
    pub color_multiplier: u32,
    pub show_boundaries: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for Renderer {
    fn from(config: &RenderConfig) -> Self {
        Self {
            cell_size_x: config.cell_size_x.max(1),
            cell_size_y: config.cell_size_y.max(1),
            color_multiplier: config.color_multiplier,
            show_boundaries: config.show_boundaries,
        }
    }
}

impl Renderer {
    /// A frame sized for `grid`.
    #[must_use]
    pub fn frame_for(&self, grid: &Grid) -> Frame {
        Frame::new(
            grid.width() * self.cell_size_x,
            grid.height() * self.cell_size_y,
        )
    }

    #[inline]
    fn intensity(&self, cell: Cell, lifetime: Lifetime) -> u8 {
        (u32::from(cell) * self.color_multiplier / u32::from(lifetime.states())).min(255) as u8
    }

    /// Draws `grid` into `frame`. With `show_boundaries`, the outermost
    /// pixel line on each side that has a fresh edge shows the remote
    /// boundary instead of local cells.
    pub fn render(&self, grid: &Grid, lifetime: Lifetime, edges: &EdgeSnapshot, frame: &mut Frame) {
        if frame.width != grid.width() * self.cell_size_x
            || frame.height != grid.height() * self.cell_size_y
        {
            *frame = self.frame_for(grid);
        }

        for y in 0..frame.height {
            let cy = y / self.cell_size_y;
            for x in 0..frame.width {
                let value = self.intensity(grid.get(x / self.cell_size_x, cy), lifetime);
                frame.set(x, y, value);
            }
        }

        if self.show_boundaries {
            self.overlay_edges(lifetime, edges, frame);
        }
    }

    fn overlay_edges(&self, lifetime: Lifetime, edges: &EdgeSnapshot, frame: &mut Frame) {
        let (w, h) = (frame.width, frame.height);
        for direction in edges.fresh_directions() {
            let Some(edge) = edges.get(direction) else {
                continue;
            };
            match direction {
                Direction::East | Direction::West => {
                    let x = if direction == Direction::East { w - 1 } else { 0 };
                    for y in 0..h {
                        if let Some(&cell) = edge.get(y / self.cell_size_y) {
                            frame.set(x, y, self.intensity(cell, lifetime));
                        }
                    }
                }
                Direction::North | Direction::South => {
                    let y = if direction == Direction::South { h - 1 } else { 0 };
                    for x in 0..w {
                        if let Some(&cell) = edge.get(x / self.cell_size_x) {
                            frame.set(x, y, self.intensity(cell, lifetime));
                        }
                    }
                }
            }
        }
    }
}
