use lifemesh_data::{Cell, CellPhase, Lifetime, RuleSet};

/// The per-cell transition function.
pub trait RuleLogic {
    /// Next state of a cell given its current state and how many of its
    /// eight neighbors are alive.
    fn next_state(&self, lifetime: Lifetime, current: Cell, live_neighbors: u8) -> Cell;
}

impl RuleLogic for RuleSet {
    #[inline]
    fn next_state(&self, lifetime: Lifetime, current: Cell, live_neighbors: u8) -> Cell {
        match lifetime.phase(current) {
            CellPhase::Dead => {
                if self.born_on(live_neighbors) {
                    lifetime.alive()
                } else {
                    Lifetime::DEAD
                }
            }
            CellPhase::Alive => {
                if self.survives_on(live_neighbors) {
                    lifetime.alive()
                } else {
                    Lifetime::DEAD
                }
            }
            // decay ignores the neighborhood
            CellPhase::Decaying(value) => value - 1,
        }
    }
}
