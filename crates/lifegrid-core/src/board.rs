//! Sparse board representation and the O(L) evolution step.
//!
//! A `Board` stores only its live cells plus the bounding rectangle, so one
//! evolution step touches at most the live cells and their in-bounds
//! neighbours (≤ 9·L cells) regardless of how large the rectangle is.
//! Boards are immutable values: `next_generation` is a pure function that
//! returns a new board.

use std::collections::HashSet;

use crate::cell::{Cell, Dimensions};
use crate::error::{CoreError, CoreResult};
use crate::rules::next_alive;

/// A sparse Game of Life board: a set of live cells inside a rectangle.
///
/// Invariant: every live cell satisfies `dims.contains(cell)`. Births that
/// would fall outside the rectangle are suppressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    dims: Dimensions,
    live: HashSet<Cell>,
}

impl Board {
    /// Build a board from a dense 0/1 matrix.
    ///
    /// Dimensions are taken from the outer and first-inner lengths. Ragged
    /// rows and cells outside `{0, 1}` are rejected; a matrix with no live
    /// cells yields an empty live set.
    pub fn from_dense(matrix: &[Vec<u8>]) -> CoreResult<Self> {
        let rows = matrix.len();
        let cols = matrix.first().map(|r| r.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(CoreError::EmptyBoard);
        }

        let dims = Dimensions::new(
            u32::try_from(rows).map_err(|_| CoreError::EmptyBoard)?,
            u32::try_from(cols).map_err(|_| CoreError::EmptyBoard)?,
        )?;

        let mut live = HashSet::new();
        for (row, values) in matrix.iter().enumerate() {
            if values.len() != cols {
                return Err(CoreError::RaggedRow {
                    row,
                    expected: cols,
                    got: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                match value {
                    0 => {}
                    1 => {
                        live.insert(Cell::new(row as i64, col as i64));
                    }
                    value => return Err(CoreError::InvalidCellValue { row, col, value }),
                }
            }
        }

        Ok(Self { dims, live })
    }

    /// Build a board directly from `(row, col)` pairs.
    ///
    /// Duplicate pairs collapse. Pairs outside the rectangle are rejected
    /// with `OutOfBounds`; the policy is uniform across the crate.
    pub fn from_pairs<I>(pairs: I, dims: Dimensions) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        let mut live = HashSet::new();
        for (row, col) in pairs {
            let cell = Cell::new(row, col);
            if !dims.contains(&cell) {
                return Err(CoreError::OutOfBounds {
                    row,
                    col,
                    rows: dims.rows(),
                    cols: dims.cols(),
                });
            }
            live.insert(cell);
        }
        Ok(Self { dims, live })
    }

    /// An empty board with the given dimensions.
    pub fn empty(dims: Dimensions) -> Self {
        Self {
            dims,
            live: HashSet::new(),
        }
    }

    /// Materialise the `rows x cols` dense 0/1 matrix.
    pub fn to_dense(&self) -> Vec<Vec<u8>> {
        let mut matrix = vec![vec![0u8; self.dims.cols() as usize]; self.dims.rows() as usize];
        for cell in &self.live {
            matrix[cell.row as usize][cell.col as usize] = 1;
        }
        matrix
    }

    /// The bounding rectangle.
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Membership test for a single cell.
    pub fn is_alive(&self, cell: &Cell) -> bool {
        self.live.contains(cell)
    }

    /// Number of live cells.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Iterate the live cells (unordered, read-only view).
    pub fn live_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.live.iter().copied()
    }

    /// Count the live Moore neighbours of a cell.
    ///
    /// Live cells are always in bounds, so membership alone decides.
    pub fn count_live_neighbours(&self, cell: &Cell) -> u8 {
        cell.neighbours()
            .iter()
            .filter(|n| self.live.contains(n))
            .count() as u8
    }

    /// Compute the next generation.
    ///
    /// The evaluation set is every live cell plus every in-bounds neighbour
    /// of a live cell; each member gets one rule application. Cells outside
    /// the rectangle are never evaluated, so out-of-bounds births cannot
    /// occur.
    pub fn next_generation(&self) -> Board {
        let mut evaluation: HashSet<Cell> = HashSet::with_capacity(self.live.len() * 9);
        for cell in &self.live {
            evaluation.insert(*cell);
            for neighbour in cell.neighbours() {
                if self.dims.contains(&neighbour) {
                    evaluation.insert(neighbour);
                }
            }
        }

        let mut next = HashSet::new();
        for cell in evaluation {
            let alive = self.live.contains(&cell);
            if next_alive(alive, self.count_live_neighbours(&cell)) {
                next.insert(cell);
            }
        }

        Board {
            dims: self.dims,
            live: next,
        }
    }

    /// Canonical, order-independent rendering of the board state.
    ///
    /// Live cells are sorted lexicographically and joined, prefixed with the
    /// rectangle, so two boards fingerprint equal exactly when they compare
    /// equal. Used for cycle detection; not cryptographic.
    pub fn fingerprint(&self) -> String {
        let mut cells: Vec<Cell> = self.live.iter().copied().collect();
        cells.sort_unstable();

        let mut out = format!("{}|", self.dims);
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            out.push_str(&cell.to_string());
        }
        out
    }
}
