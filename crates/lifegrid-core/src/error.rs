//! Error types for the core board engine.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while building or converting boards.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A dense matrix had zero rows or zero columns.
    #[error("board must have at least one row and one column")]
    EmptyBoard,

    /// A dense matrix row did not match the width of the first row.
    #[error("ragged row {row}: expected {expected} columns, got {got}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// A dense matrix cell held something other than 0 or 1.
    #[error("invalid cell value {value} at ({row}, {col}): cells must be 0 or 1")]
    InvalidCellValue { row: usize, col: usize, value: u8 },

    /// A sparse pair fell outside the board rectangle.
    #[error("cell ({row}, {col}) is outside a {rows}x{cols} board")]
    OutOfBounds {
        row: i64,
        col: i64,
        rows: u32,
        cols: u32,
    },

    /// A coordinate string did not parse as `"row,col"`.
    #[error("invalid coordinate string: {input:?}")]
    InvalidCoordinate { input: String },

    /// Dimensions with a zero extent were requested.
    #[error("dimensions must be >= 1 in both extents (got {rows}x{cols})")]
    ZeroDimension { rows: u32, cols: u32 },
}
