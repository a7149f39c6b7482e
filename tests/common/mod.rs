pub mod macros;

use lifemesh_core::{AppConfig, Tile};
use lifemesh_data::{Grid, Lifetime, RuleSet};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[allow(dead_code)]
pub struct TileBuilder {
    width: usize,
    height: usize,
    pattern: Option<Vec<String>>,
    rules: RuleSet,
    lifetime: Lifetime,
    seed: Option<u64>,
}

#[allow(dead_code)]
impl TileBuilder {
    pub fn new() -> Self {
        Self {
            width: 16,
            height: 16,
            pattern: None,
            rules: RuleSet::default(),
            lifetime: Lifetime::default(),
            seed: None,
        }
    }

    pub fn size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Rows in `Grid::from_ascii` notation; overrides `size`.
    pub fn pattern(mut self, rows: &[&str]) -> Self {
        self.pattern = Some(rows.iter().map(|r| r.to_string()).collect());
        self
    }

    pub fn rules(mut self, notation: &str) -> Self {
        self.rules = RuleSet::from_notation(notation).expect("bad rule notation in test");
        self
    }

    pub fn lifetime(mut self, states: u8) -> Self {
        self.lifetime = Lifetime::new(states).expect("bad lifetime in test");
        self
    }

    /// Fills the tile with random states from a seeded RNG.
    pub fn random(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn grid(&self) -> Grid {
        match &self.pattern {
            Some(rows) => {
                let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
                Grid::from_ascii(&rows, self.lifetime).expect("bad pattern in test")
            }
            None => Grid::new(self.width, self.height),
        }
    }

    pub fn build(self) -> Tile {
        let mut tile = Tile::from_grid(self.grid(), self.rules, self.lifetime);
        if let Some(seed) = self.seed {
            tile.randomize(&mut ChaCha8Rng::seed_from_u64(seed));
        }
        tile
    }
}

/// A small seeded configuration that passes validation.
#[allow(dead_code)]
pub fn small_config(width: usize, height: usize, seed: u64) -> AppConfig {
    let mut config = AppConfig {
        seed: Some(seed),
        ..Default::default()
    };
    config.grid.width = width;
    config.grid.height = height;
    config.perturbation.max_thickness = (height / 2) as u16;
    config
}

/// Text form of a grid for assertion messages: `#` alive, `.` dead,
/// digits for decaying cells.
#[allow(dead_code)]
pub fn ascii(grid: &Grid, lifetime: Lifetime) -> String {
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for y in 0..grid.height() {
        for &cell in grid.row(y) {
            out.push(if cell == Lifetime::DEAD {
                '.'
            } else if lifetime.is_alive(cell) {
                '#'
            } else {
                char::from(b'0' + cell.min(9))
            });
        }
        out.push('\n');
    }
    out
}
