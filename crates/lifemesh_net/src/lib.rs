//! # Lifemesh Net
//!
//! Datagram transports for the boundary exchange. Both implement
//! [`lifemesh_core::Transport`] for the outbound half and feed inbound
//! packets into an [`lifemesh_core::EdgeCache`].
//!
//! Delivery is best-effort everywhere: no ordering, no acknowledgment,
//! no retry.

/// In-process hub with optional packet loss
pub mod memory;
/// UDP sockets on the tokio runtime
pub mod udp;

pub use memory::{HubStats, MemoryHub, MemoryTransport};
pub use udp::UdpTransport;
