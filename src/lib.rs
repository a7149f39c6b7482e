//! # Lifemesh
//!
//! Runs one tile of a distributed decay-state cellular automaton. Tiles
//! exchange their boundary rows and columns over a best-effort datagram
//! transport; a tile that hears nothing from a neighbor wraps locally and
//! keeps running.

pub mod app;
pub mod headless;
pub mod mesh;
pub mod node;
pub mod simulation;

pub use app::{run, RunOptions, ShutdownManager};
pub use headless::HeadlessSink;
pub use mesh::Mesh;
pub use node::{Node, TickReport};
pub use simulation::Simulation;
