use serde::{Deserialize, Serialize};

/// A single cell state in `[0, L-1]`.
pub type Cell = u8;

/// Which of the three phases a cell value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellPhase {
    Dead,
    /// Counts down towards dead once per generation.
    Decaying(Cell),
    Alive,
}

/// Number of distinct cell states `L`. `0` is dead, `L-1` is alive and
/// everything in between is decaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Lifetime(u8);

impl Lifetime {
    pub const DEAD: Cell = 0;

    /// Returns `None` for lifetimes below two, which would leave no room
    /// for both a dead and an alive state.
    #[must_use]
    pub const fn new(states: u8) -> Option<Self> {
        if states >= 2 {
            Some(Self(states))
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn states(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn alive(self) -> Cell {
        self.0 - 1
    }

    #[inline]
    #[must_use]
    pub const fn is_alive(self, cell: Cell) -> bool {
        cell == self.alive()
    }

    #[must_use]
    pub const fn phase(self, cell: Cell) -> CellPhase {
        if cell == Self::DEAD {
            CellPhase::Dead
        } else if cell >= self.alive() {
            CellPhase::Alive
        } else {
            CellPhase::Decaying(cell)
        }
    }

    /// Clamps a foreign value into the cell-state domain.
    #[inline]
    #[must_use]
    pub fn clamp(self, cell: Cell) -> Cell {
        cell.min(self.alive())
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self(7)
    }
}

impl TryFrom<u8> for Lifetime {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("lifetime must be at least 2, got {value}"))
    }
}

impl From<Lifetime> for u8 {
    fn from(value: Lifetime) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_rejects_degenerate_values() {
        assert!(Lifetime::new(0).is_none());
        assert!(Lifetime::new(1).is_none());
        assert_eq!(Lifetime::new(2).map(Lifetime::alive), Some(1));
    }

    #[test]
    fn test_phase_classification() {
        let l = Lifetime::default();
        assert_eq!(l.phase(0), CellPhase::Dead);
        assert_eq!(l.phase(6), CellPhase::Alive);
        assert_eq!(l.phase(3), CellPhase::Decaying(3));
    }

    #[test]
    fn test_binary_lifetime_has_no_decay() {
        let l = Lifetime::new(2).unwrap();
        assert_eq!(l.phase(0), CellPhase::Dead);
        assert_eq!(l.phase(1), CellPhase::Alive);
    }
}
