//! Reseeding a band of rows so the tile never settles into an all-dead
//! grid, plus the knob that sets how thick the band is.

use std::ops::Range;

use lifemesh_data::{Grid, Lifetime};
use rand::Rng;

/// Overwrites rows `[height/2 - thickness, height/2 + thickness)`, clamped
/// to the grid, with random states in `[0, L)`. Returns the rows touched.
pub fn inject<R: Rng + ?Sized>(
    grid: &mut Grid,
    thickness: usize,
    lifetime: Lifetime,
    rng: &mut R,
) -> Range<usize> {
    let band = band(grid.height(), thickness);
    let states = lifetime.states();
    for y in band.clone() {
        for cell in grid.row_mut(y) {
            *cell = rng.gen_range(0..states);
        }
    }
    band
}

/// Rows reseeded for a given thickness; empty for zero.
#[must_use]
pub fn band(height: usize, thickness: usize) -> Range<usize> {
    if thickness == 0 {
        return 0..0;
    }
    let center = height / 2;
    let from = center.saturating_sub(thickness);
    let to = center.saturating_add(thickness).min(height);
    from..to
}

/// Integer linear remap of `value` from `[in_min, in_max]` to
/// `[out_min, out_max]`, clamped to the output range.
#[must_use]
pub fn map_range(value: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    if in_max == in_min {
        return out_min;
    }
    let mapped = (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min;
    let (lo, hi) = if out_min <= out_max {
        (out_min, out_max)
    } else {
        (out_max, out_min)
    };
    mapped.clamp(lo, hi)
}

/// A raw analog-style sample mapped onto a band thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Knob {
    raw: u16,
    raw_max: u16,
    max_thickness: u16,
}

impl Knob {
    /// 9-bit raw resolution.
    pub const DEFAULT_RAW_MAX: u16 = 511;

    #[must_use]
    pub fn new(raw_max: u16, max_thickness: u16) -> Self {
        Self {
            raw: 0,
            raw_max: raw_max.max(1),
            max_thickness,
        }
    }

    /// A knob turned to the raw position closest to `thickness`.
    #[must_use]
    pub fn at_thickness(raw_max: u16, max_thickness: u16, thickness: u16) -> Self {
        let mut knob = Self::new(raw_max, max_thickness);
        if max_thickness > 0 {
            // round up so the mapped-back thickness lands on the target
            let t = u32::from(thickness.min(max_thickness));
            let max = u32::from(max_thickness);
            let raw = (t * u32::from(knob.raw_max) + max - 1) / max;
            knob.set_raw(raw as u16);
        }
        knob
    }

    pub fn set_raw(&mut self, raw: u16) {
        self.raw = raw.min(self.raw_max);
    }

    #[must_use]
    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// Moves the knob by `steps` output notches.
    pub fn turn(&mut self, steps: i32) {
        let max = i64::from(self.max_thickness.max(1));
        let notch = (i64::from(self.raw_max) + max - 1) / max;
        let raw = (i64::from(self.raw) + i64::from(steps) * notch)
            .clamp(0, i64::from(self.raw_max));
        self.raw = raw as u16;
    }

    #[must_use]
    pub fn thickness(&self) -> usize {
        map_range(
            i64::from(self.raw),
            0,
            i64::from(self.raw_max),
            0,
            i64::from(self.max_thickness),
        ) as usize
    }
}

impl Default for Knob {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RAW_MAX, 15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zero_thickness_is_noop() {
        let mut grid = Grid::new(8, 8);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rows = inject(&mut grid, 0, Lifetime::default(), &mut rng);
        assert!(rows.is_empty());
        assert!(grid.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_band_is_centered() {
        assert_eq!(band(120, 2), 58..62);
        assert_eq!(band(120, 15), 45..75);
    }

    #[test]
    fn test_band_clamps_to_grid() {
        assert_eq!(band(10, 7), 0..10);
        assert_eq!(band(3, 100), 0..3);
        assert_eq!(band(1, 1), 0..1);
    }

    #[test]
    fn test_inject_only_touches_band() {
        let l = Lifetime::default();
        let mut grid = Grid::new(6, 10);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let rows = inject(&mut grid, 1, l, &mut rng);
        assert_eq!(rows, 4..6);
        for y in 0..10 {
            if !rows.contains(&y) {
                assert!(grid.row(y).iter().all(|&c| c == 0), "row {y} touched");
            }
        }
        assert!(grid.cells().iter().all(|&c| c < l.states()));
    }

    #[test]
    fn test_map_range_matches_analog_mapping() {
        assert_eq!(map_range(0, 0, 511, 0, 15), 0);
        assert_eq!(map_range(511, 0, 511, 0, 15), 15);
        assert_eq!(map_range(256, 0, 511, 0, 15), 7);
        assert_eq!(map_range(900, 0, 511, 0, 15), 15);
        assert_eq!(map_range(5, 3, 3, 0, 15), 0);
    }

    #[test]
    fn test_knob_turns_in_notches() {
        let mut knob = Knob::default();
        assert_eq!(knob.thickness(), 0);
        knob.turn(1);
        assert_eq!(knob.thickness(), 1);
        knob.turn(100);
        assert_eq!(knob.thickness(), 15);
        knob.turn(-100);
        assert_eq!(knob.thickness(), 0);
    }

    #[test]
    fn test_knob_at_thickness() {
        for t in 0..=15 {
            assert_eq!(Knob::at_thickness(511, 15, t).thickness(), usize::from(t));
        }
        assert_eq!(Knob::at_thickness(511, 0, 4).thickness(), 0);
    }
}
