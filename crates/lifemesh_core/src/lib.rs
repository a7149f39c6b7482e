//! # Lifemesh Core
//!
//! The simulation engine for one tile of a multi-node cellular automaton.
//!
//! A tile owns a rectangular slice of a larger toroidal universe. Each
//! generation it:
//! - resolves neighbor cells through [`lookup::NeighborLookup`], which
//!   wraps locally unless a neighbor tile has sent a fresh boundary,
//! - applies the birth/survival/decay rule ([`rules::RuleLogic`]),
//! - swaps its double buffer ([`tile::Tile`]),
//! - optionally reseeds a band of rows ([`perturbation`]),
//! - exports its own boundaries to linked peers ([`exporter`]).
//!
//! Incoming boundaries land in the [`edge_cache::EdgeCache`], which is the
//! only state shared between the tick loop and the receive path.
//!
//! ## Example
//!
//! ```
//! use lifemesh_core::edge_cache::EdgeSnapshot;
//! use lifemesh_core::tile::Tile;
//! use lifemesh_data::{Grid, Lifetime, RuleSet};
//!
//! let lifetime = Lifetime::default();
//! let grid = Grid::from_ascii(&[".....", "..#..", "..#..", "..#..", "....."], lifetime).unwrap();
//! let mut tile = Tile::from_grid(grid.clone(), RuleSet::default(), lifetime);
//!
//! tile.advance(&EdgeSnapshot::empty());
//! tile.advance(&EdgeSnapshot::empty());
//! assert_eq!(tile.grid(), &grid);
//! ```

/// Typed configuration loaded from `config.toml`
pub mod config;
/// Per-direction cache of received neighbor boundaries
pub mod edge_cache;
/// Error types for the receive and send paths
pub mod error;
/// Boundary extraction and fire-and-forget export
pub mod exporter;
/// Direction to peer bindings
pub mod links;
/// Toroidal-with-override neighbor resolution
pub mod lookup;
/// Counters and structured logging
pub mod metrics;
/// Row-band reseeding and the perturbation knob
pub mod perturbation;
/// Cell-to-pixel mapping and the frame sink seam
pub mod render;
/// Birth/survival/decay transition rule
pub mod rules;
/// Double-buffered evolution engine
pub mod tile;
/// Datagram transport seam
pub mod transport;

pub use config::AppConfig;
pub use edge_cache::{EdgeCache, EdgeEntry, EdgeSnapshot, StalenessPolicy};
pub use error::{EdgeError, TransportError};
pub use exporter::{boundary_for, EdgeExporter, ExportReport};
pub use links::Links;
pub use lookup::NeighborLookup;
pub use metrics::{init_logging, init_logging_with_writer, Metrics, MetricsSnapshot};
pub use perturbation::{inject, map_range, Knob};
pub use render::{Frame, FrameSink, Renderer, SinkEvent, TileStatus};
pub use rules::RuleLogic;
pub use tile::Tile;
pub use transport::Transport;
