use lifemesh_core::{Frame, TileStatus};

/// Something the run loop can advance and display: a single [`crate::Node`]
/// or an in-process [`crate::Mesh`].
pub trait Simulation {
    /// Advances one generation with the given perturbation band.
    fn step(&mut self, thickness: usize);

    fn generation(&self) -> u64;

    /// Renders the current committed state.
    fn frame(&mut self) -> &Frame;

    fn status(&self, thickness: usize) -> TileStatus;

    /// Final report printed when a headless run ends.
    fn summary(&self) -> serde_json::Value;
}
