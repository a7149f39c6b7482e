mod common;

use common::TileBuilder;
use lifemesh_core::{EdgeSnapshot, RuleLogic};
use lifemesh_data::{Grid, Lifetime, RuleSet};

fn shifted(grid: &Grid, dx: usize, dy: usize) -> Grid {
    let (w, h) = (grid.width(), grid.height());
    let mut out = Grid::new(w, h);
    for y in 0..h {
        for x in 0..w {
            out.set((x + dx) % w, (y + dy) % h, grid.get(x, y));
        }
    }
    out
}

#[test]
fn test_block_is_invariant() {
    let mut tile = TileBuilder::new()
        .pattern(&[
            "......", //
            "......",
            "..##..",
            "..##..",
            "......",
            "......",
        ])
        .build();
    let before = tile.grid().clone();
    tile.advance(&EdgeSnapshot::empty());
    assert_grid_eq!(*tile.grid(), before);
    assert_live_cells!(tile, 4);
}

#[test]
fn test_blinker_period_two() {
    let mut tile = TileBuilder::new()
        .pattern(&[
            ".....", //
            ".....",
            ".###.",
            ".....",
            ".....",
        ])
        .build();
    let start = tile.grid().clone();

    tile.advance(&EdgeSnapshot::empty());
    assert_ne!(*tile.grid(), start);
    let vertical = TileBuilder::new()
        .pattern(&[
            ".....", //
            "..#..",
            "..#..",
            "..#..",
            ".....",
        ])
        .grid();
    assert_grid_eq!(*tile.grid(), vertical);

    tile.advance(&EdgeSnapshot::empty());
    assert_grid_eq!(*tile.grid(), start);
}

#[test]
fn test_glider_crosses_torus() {
    let mut tile = TileBuilder::new()
        .pattern(&[
            ".#......", //
            "..#.....",
            "###.....",
            "........",
            "........",
            "........",
            "........",
            "........",
        ])
        .build();
    let start = tile.grid().clone();

    // one diagonal step every four generations; 32 generations bring it home
    for step in 1..=8 {
        for _ in 0..4 {
            tile.advance(&EdgeSnapshot::empty());
        }
        assert_grid_eq!(*tile.grid(), shifted(&start, step % 8, step % 8));
        assert_live_cells!(tile, 5);
    }
}

#[test]
fn test_decay_ignores_neighbors() {
    let lifetime = Lifetime::default();
    let rules = RuleSet::default();
    for s in 1..lifetime.alive() {
        for live in 0..=8 {
            assert_eq!(rules.next_state(lifetime, s, live), s - 1);
        }
    }
}

#[test]
fn test_decaying_cell_in_crowd() {
    // surrounded by alive cells, the center still just counts down
    let mut tile = TileBuilder::new()
        .pattern(&[
            ".....", //
            ".###.",
            ".#4#.",
            ".###.",
            ".....",
        ])
        .build();
    tile.advance(&EdgeSnapshot::empty());
    assert_eq!(tile.grid().get(2, 2), 3);
}

#[test]
fn test_decay_reaches_dead() {
    let mut tile = TileBuilder::new().size(4, 4).build();
    let lifetime = tile.lifetime();
    tile.grid_mut().set(1, 1, lifetime.alive() - 1);
    for expected in (0..lifetime.alive() - 1).rev() {
        tile.advance(&EdgeSnapshot::empty());
        assert_eq!(tile.grid().get(1, 1), expected);
    }
    tile.advance(&EdgeSnapshot::empty());
    assert_eq!(tile.grid().get(1, 1), Lifetime::DEAD);
}

#[test]
fn test_custom_rules_and_lifetime() {
    // B2/S with three states: a lone pair seeds cells that then decay
    let mut tile = TileBuilder::new()
        .lifetime(3)
        .rules("B2/S")
        .pattern(&[
            "......", //
            "......",
            "..##..",
            "......",
            "......",
        ])
        .build();
    tile.advance(&EdgeSnapshot::empty());
    let g = tile.grid();
    // the old pair dies outright (no survival), cells above and below are born
    assert_eq!(g.get(2, 2), 0);
    assert_eq!(g.get(3, 2), 0);
    assert_eq!(g.get(2, 1), 2);
    assert_eq!(g.get(3, 3), 2);
}

#[test]
fn test_seeded_tiles_match() {
    let a = TileBuilder::new().random(99).build();
    let b = TileBuilder::new().random(99).build();
    assert_grid_eq!(*a.grid(), *b.grid());
    assert_in_domain!(a.grid(), a.lifetime());
}
