//! # Lifemesh Data
//!
//! Plain data shared by every lifemesh crate: cell states and their
//! lifetime, birth/survival rule masks, compass directions, peer
//! identities, the cell grid and the boundary datagram wire layout.
//!
//! Nothing in here knows about time, sockets or threads.

/// Cell states and the configured lifetime
pub mod cell;
/// Boundary datagram wire layout
pub mod datagram;
/// Compass directions and peer identities
pub mod direction;
/// Decoding and parsing errors
pub mod error;
/// Row-major cell grid
pub mod grid;
/// Birth/survival rule masks and `B3/S23` notation
pub mod rules;

pub use cell::{Cell, CellPhase, Lifetime};
pub use datagram::{BoundaryDatagram, LABEL_LEN};
pub use direction::{Direction, PeerId};
pub use error::DataError;
pub use grid::Grid;
pub use rules::RuleSet;
