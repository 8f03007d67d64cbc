//! Persisted board records and sparse-pair conversions.

use std::time::SystemTime;

use lifegrid_core::{Board, Cell, Dimensions};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// A persisted seed board.
///
/// Records are write-once: the sparse list and dimensions never change
/// after creation, and the identifier is minted exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRecord {
    /// Opaque identifier, a lowercase hyphenated UUID at the boundary.
    pub board_id: String,

    /// Live cells as `(row, col)` pairs.
    pub state: Vec<(i64, i64)>,

    /// Bounding rectangle of the board.
    pub dimensions: Dimensions,

    /// When the record was created.
    pub created_at: SystemTime,

    /// When the record was last written.
    pub updated_at: SystemTime,
}

impl BoardRecord {
    /// Create a record for a freshly uploaded seed.
    pub fn new(board_id: impl Into<String>, board: &Board) -> Self {
        let now = SystemTime::now();
        Self {
            board_id: board_id.into(),
            state: cells_to_pairs(board.live_cells()),
            dimensions: board.dimensions(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild the sparse board this record describes.
    pub fn to_board(&self) -> StoreResult<Board> {
        Board::from_pairs(self.state.iter().copied(), self.dimensions).map_err(|e| {
            StoreError::Compute {
                message: format!("stored record {} is invalid: {e}", self.board_id),
            }
        })
    }
}

/// Convert cells to `(row, col)` pairs, preserving every coordinate.
pub fn cells_to_pairs<I>(cells: I) -> Vec<(i64, i64)>
where
    I: IntoIterator<Item = Cell>,
{
    cells.into_iter().map(Into::into).collect()
}

/// Convert `(row, col)` pairs back to cells.
pub fn pairs_to_cells(pairs: &[(i64, i64)]) -> Vec<Cell> {
    pairs.iter().copied().map(Into::into).collect()
}
