//! Cell coordinates and board dimensions.
//!
//! A `Cell` is an ordered `(row, col)` pair of signed integers. Cells are
//! plain values: cheap to copy, hashable, and totally ordered so that a set
//! of cells has a canonical rendering. The string form `"row,col"` is an
//! exact round-trip for every finite pair and is what the board fingerprint
//! is built from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// The eight Moore-neighbourhood offsets, `{-1, 0, 1}² \ {(0, 0)}`.
pub const NEIGHBOUR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A position on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Row index (0 at the top edge of the rectangle).
    pub row: i64,
    /// Column index (0 at the left edge of the rectangle).
    pub col: i64,
}

impl Cell {
    /// Create a cell at `(row, col)`.
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// The eight Moore neighbours of this cell, in offset order.
    pub fn neighbours(&self) -> [Cell; 8] {
        NEIGHBOUR_OFFSETS.map(|(dr, dc)| Cell::new(self.row + dr, self.col + dc))
    }

    /// Whether this cell lies inside the given rectangle.
    pub fn in_bounds(&self, dims: Dimensions) -> bool {
        dims.contains(self)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Cell {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidCoordinate {
            input: s.to_string(),
        };

        let (row, col) = s.split_once(',').ok_or_else(invalid)?;
        let row = row.parse::<i64>().map_err(|_| invalid())?;
        let col = col.parse::<i64>().map_err(|_| invalid())?;
        Ok(Cell::new(row, col))
    }
}

impl From<(i64, i64)> for Cell {
    fn from((row, col): (i64, i64)) -> Self {
        Cell::new(row, col)
    }
}

impl From<Cell> for (i64, i64) {
    fn from(cell: Cell) -> Self {
        (cell.row, cell.col)
    }
}

/// The inclusive rectangle `[0, rows) x [0, cols)` bounding a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    rows: u32,
    cols: u32,
}

impl Dimensions {
    /// Create dimensions; both extents must be at least 1.
    pub fn new(rows: u32, cols: u32) -> CoreResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(CoreError::ZeroDimension { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Whether a cell lies inside the rectangle.
    pub fn contains(&self, cell: &Cell) -> bool {
        cell.row >= 0
            && cell.row < i64::from(self.rows)
            && cell.col >= 0
            && cell.col < i64::from(self.cols)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours_are_the_moore_neighbourhood() {
        let cell = Cell::new(5, 7);
        let neighbours = cell.neighbours();

        assert_eq!(neighbours.len(), 8);
        for n in &neighbours {
            assert_ne!(*n, cell);
            assert!((n.row - cell.row).abs() <= 1);
            assert!((n.col - cell.col).abs() <= 1);
        }

        // All eight are distinct
        let mut sorted = neighbours.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 8);
    }

    #[test]
    fn test_display_parse_round_trip() {
        for cell in [
            Cell::new(0, 0),
            Cell::new(-3, 12),
            Cell::new(i64::MAX, i64::MIN),
        ] {
            let rendered = cell.to_string();
            assert_eq!(rendered.parse::<Cell>().unwrap(), cell);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "1", "1,2,3", "a,b", "1, 2 extra"] {
            assert!(input.parse::<Cell>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_dimensions_reject_zero_extents() {
        assert!(Dimensions::new(0, 5).is_err());
        assert!(Dimensions::new(5, 0).is_err());
        assert!(Dimensions::new(1, 1).is_ok());
    }

    #[test]
    fn test_bounds_checks() {
        let dims = Dimensions::new(3, 4).unwrap();

        assert!(Cell::new(0, 0).in_bounds(dims));
        assert!(Cell::new(2, 3).in_bounds(dims));
        assert!(!Cell::new(3, 0).in_bounds(dims));
        assert!(!Cell::new(0, 4).in_bounds(dims));
        assert!(!Cell::new(-1, 0).in_bounds(dims));
        assert!(!Cell::new(0, -1).in_bounds(dims));
    }
}
