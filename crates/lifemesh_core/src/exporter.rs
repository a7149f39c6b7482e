//! Outbound half of the boundary exchange.

use lifemesh_data::{BoundaryDatagram, Cell, Direction, Grid};

use crate::links::Links;
use crate::metrics::Metrics;
use crate::transport::Transport;

/// The row or column of `grid` that touches `direction`'s edge. East and
/// west boundaries are indexed by row, north and south by column.
#[must_use]
pub fn boundary_for(grid: &Grid, direction: Direction) -> Vec<Cell> {
    match direction {
        Direction::North => grid.row(0).to_vec(),
        Direction::South => grid.row(grid.height() - 1).to_vec(),
        Direction::East => grid.column(grid.width() - 1),
        Direction::West => grid.column(0),
    }
}

/// Outcome of one export pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub sent: usize,
    pub failed: usize,
}

/// Sends this tile's boundaries to every linked peer once per generation.
#[derive(Debug, Clone)]
pub struct EdgeExporter {
    label: String,
}

impl EdgeExporter {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Builds the datagram for each linked side.
    #[must_use]
    pub fn datagrams(&self, grid: &Grid, links: &Links) -> Vec<(Direction, BoundaryDatagram)> {
        links
            .iter()
            .map(|(direction, _)| {
                let dg = BoundaryDatagram::new(&self.label, boundary_for(grid, direction));
                (direction, dg)
            })
            .collect()
    }

    /// Fire-and-forget send to every linked peer. Failures are logged and
    /// counted; the next generation exports again regardless.
    pub fn export<T: Transport + ?Sized>(
        &self,
        grid: &Grid,
        links: &Links,
        transport: &T,
        metrics: &Metrics,
    ) -> ExportReport {
        let mut report = ExportReport::default();
        for (direction, datagram) in self.datagrams(grid, links) {
            let Some(peer) = links.peer(direction) else {
                continue;
            };
            match transport.send(peer, &datagram.encode()) {
                Ok(()) => {
                    report.sent += 1;
                    metrics.record_sent();
                }
                Err(e) => {
                    report.failed += 1;
                    metrics.record_send_failure();
                    tracing::warn!(%peer, %direction, error = %e, "boundary send failed");
                }
            }
        }
        report
    }
}
