//! Neighbor resolution across tile edges.
//!
//! Inside the grid a read returns the local cell. Past an edge it reads the
//! neighbor tile's boundary when that side has fresh data, and otherwise
//! wraps around to the opposite local edge.

use lifemesh_data::{Cell, Direction, Grid, Lifetime};

use crate::edge_cache::EdgeSnapshot;

/// Moore-neighborhood offsets, self excluded.
pub const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Read-only view combining the committed grid with a generation's edges.
#[derive(Debug, Clone, Copy)]
pub struct NeighborLookup<'a> {
    grid: &'a Grid,
    edges: &'a EdgeSnapshot,
}

impl<'a> NeighborLookup<'a> {
    #[must_use]
    pub fn new(grid: &'a Grid, edges: &'a EdgeSnapshot) -> Self {
        Self { grid, edges }
    }

    /// State of the cell at `(x, y)`, where either coordinate may lie
    /// outside the grid.
    ///
    /// An out-of-range row consults the north/south edge first; the row is
    /// then wrapped and an out-of-range column consults the east/west edge.
    /// Anything not covered by a fresh edge wraps toroidally.
    #[must_use]
    pub fn state_at(&self, x: isize, y: isize) -> Cell {
        let width = self.grid.width() as isize;
        let height = self.grid.height() as isize;
        let wx = x.rem_euclid(width) as usize;
        let wy = y.rem_euclid(height) as usize;

        let vertical = if y < 0 {
            Some(Direction::North)
        } else if y >= height {
            Some(Direction::South)
        } else {
            None
        };
        if let Some(cell) = vertical.and_then(|d| self.remote(d, wx)) {
            return cell;
        }

        let horizontal = if x < 0 {
            Some(Direction::West)
        } else if x >= width {
            Some(Direction::East)
        } else {
            None
        };
        if let Some(cell) = horizontal.and_then(|d| self.remote(d, wy)) {
            return cell;
        }

        self.grid.get(wx, wy)
    }

    /// Number of alive cells among the eight neighbors of `(x, y)`.
    #[must_use]
    pub fn live_neighbors(&self, x: usize, y: usize, lifetime: Lifetime) -> u8 {
        let (x, y) = (x as isize, y as isize);
        MOORE_OFFSETS
            .iter()
            .filter(|(dx, dy)| lifetime.is_alive(self.state_at(x + dx, y + dy)))
            .count() as u8
    }

    #[inline]
    fn remote(&self, direction: Direction, index: usize) -> Option<Cell> {
        self.edges
            .get(direction)
            .and_then(|edge| edge.get(index).copied())
    }
}
