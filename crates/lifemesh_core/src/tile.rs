use lifemesh_data::{Cell, Direction, Grid, Lifetime, RuleSet};
use rand::Rng;
#[cfg(feature = "std")]
use rayon::prelude::*;

use crate::edge_cache::EdgeSnapshot;
use crate::exporter::boundary_for;
use crate::lookup::NeighborLookup;
use crate::perturbation;
use crate::rules::RuleLogic;

/// One node's slice of the universe: a committed grid that readers see and
/// a working grid that the next generation is written into.
#[derive(Debug, Clone)]
pub struct Tile {
    committed: Grid,
    working: Grid,
    rules: RuleSet,
    lifetime: Lifetime,
    generation: u64,
}

impl Tile {
    /// An all-dead tile.
    #[must_use]
    pub fn new(width: usize, height: usize, rules: RuleSet, lifetime: Lifetime) -> Self {
        Self::from_grid(Grid::new(width, height), rules, lifetime)
    }

    #[must_use]
    pub fn from_grid(grid: Grid, rules: RuleSet, lifetime: Lifetime) -> Self {
        let working = grid.clone();
        Self {
            committed: grid,
            working,
            rules,
            lifetime,
            generation: 0,
        }
    }

    /// Fills every cell with a uniformly random state in `[0, L)`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let states = self.lifetime.states();
        for cell in self.committed.cells_mut() {
            *cell = rng.gen_range(0..states);
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.committed
    }

    /// Direct access to the committed grid between generations.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.committed
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.committed.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.committed.height()
    }

    #[must_use]
    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    pub fn set_rules(&mut self, rules: RuleSet) {
        self.rules = rules;
    }

    #[must_use]
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn live_cells(&self) -> usize {
        self.committed.count_alive(self.lifetime)
    }

    /// Computes the next generation into the working buffer, then swaps it
    /// in. Readers of [`Tile::grid`] only ever see whole generations.
    pub fn advance(&mut self, edges: &EdgeSnapshot) {
        let lookup = NeighborLookup::new(&self.committed, edges);
        let current = &self.committed;
        let rules = self.rules;
        let lifetime = self.lifetime;
        let width = current.width();

        let evolve_row = |(y, row): (usize, &mut [Cell])| {
            for (x, out) in row.iter_mut().enumerate() {
                let live = lookup.live_neighbors(x, y, lifetime);
                *out = rules.next_state(lifetime, current.get(x, y), live);
            }
        };

        #[cfg(feature = "std")]
        let rows = self.working.cells_mut().par_chunks_mut(width);
        #[cfg(not(feature = "std"))]
        let rows = self.working.cells_mut().chunks_mut(width);
        rows.enumerate().for_each(evolve_row);

        std::mem::swap(&mut self.committed, &mut self.working);
        self.generation += 1;
    }

    /// Reseeds the horizontal band around the middle row. See
    /// [`perturbation::inject`].
    pub fn perturb<R: Rng + ?Sized>(
        &mut self,
        thickness: usize,
        rng: &mut R,
    ) -> std::ops::Range<usize> {
        perturbation::inject(&mut self.committed, thickness, self.lifetime, rng)
    }

    #[must_use]
    pub fn boundary(&self, direction: Direction) -> Vec<Cell> {
        boundary_for(&self.committed, direction)
    }
}
