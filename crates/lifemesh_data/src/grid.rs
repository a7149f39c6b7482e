use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Lifetime};
use crate::error::DataError;

/// Fixed-size, row-major rectangle of cells.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// An all-dead grid.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Lifetime::DEAD; width * height],
        }
    }

    /// Loads a grid from text rows: `#` is alive, `.` is dead and a digit
    /// is that literal cell value. All rows must share one width.
    pub fn from_ascii(rows: &[&str], lifetime: Lifetime) -> Result<Self, DataError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut grid = Self::new(width, height);

        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(DataError::Pattern(format!(
                    "row {y} has width {}, expected {width}",
                    row.len()
                )));
            }
            for (x, byte) in row.bytes().enumerate() {
                let cell = match byte {
                    b'#' => lifetime.alive(),
                    b'.' => Lifetime::DEAD,
                    b'0'..=b'9' => lifetime.clamp(byte - b'0'),
                    other => {
                        return Err(DataError::Pattern(format!(
                            "unexpected '{}' at ({x}, {y})",
                            other as char
                        )))
                    }
                };
                grid.set(x, y, cell);
            }
        }
        Ok(grid)
    }

    #[inline(always)]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    #[must_use]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Panics when `(x, y)` is outside the grid.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[self.index(x, y)]
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        let idx = self.index(x, y);
        self.cells[idx] = cell;
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [Cell] {
        let start = y * self.width;
        &mut self.cells[start..start + self.width]
    }

    #[must_use]
    pub fn column(&self, x: usize) -> Vec<Cell> {
        (0..self.height).map(|y| self.get(x, y)).collect()
    }

    #[must_use]
    pub fn count_alive(&self, lifetime: Lifetime) -> usize {
        self.cells.iter().filter(|&&c| lifetime.is_alive(c)).count()
    }
}
