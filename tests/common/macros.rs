/// Asserts that two grids are equal, printing both as text on failure.
#[macro_export]
macro_rules! assert_grid_eq {
    ($left:expr, $right:expr) => {
        let (left, right) = (&$left, &$right);
        let lifetime = lifemesh_data::Lifetime::default();
        assert!(
            left == right,
            "grids differ\nleft:\n{}\nright:\n{}",
            $crate::common::ascii(left, lifetime),
            $crate::common::ascii(right, lifetime)
        );
    };
}

/// Asserts the number of alive cells in a tile.
#[macro_export]
macro_rules! assert_live_cells {
    ($tile:expr, $count:expr) => {
        assert_eq!($tile.live_cells(), $count, "Live cell count mismatch");
    };
}

/// Asserts that every cell lies in `[0, L)`.
#[macro_export]
macro_rules! assert_in_domain {
    ($grid:expr, $lifetime:expr) => {
        let states = $lifetime.states();
        assert!(
            $grid.cells().iter().all(|&c| c < states),
            "cell outside [0, {})",
            states
        );
    };
}
