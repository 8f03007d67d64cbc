//! Step command: advance a board offline, without the server.

use std::path::Path;

use anyhow::{Context, Result};
use lifegrid_core::Board;

/// Execute the step command.
///
/// Reads a dense 0/1 matrix from a JSON file, advances it the requested
/// number of generations, and prints the resulting matrix to stdout.
pub fn execute(input: &Path, generations: u64) -> Result<()> {
    let json = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let dense: Vec<Vec<u8>> =
        serde_json::from_str(&json).context("Input must be a JSON matrix of 0/1 cells")?;

    let mut board = Board::from_dense(&dense).context("Invalid board")?;
    for _ in 0..generations {
        board = board.next_generation();
    }

    println!("{}", serde_json::to_string(&board.to_dense())?);
    eprintln!(
        "{} generation(s): {} live cell(s) on a {} board",
        generations,
        board.live_count(),
        board.dimensions()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_step_round_trips_a_blinker_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[0,1,0],[0,1,0],[0,1,0]]").unwrap();

        execute(file.path(), 2).unwrap();
    }

    #[test]
    fn test_step_rejects_garbage_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(execute(file.path(), 1).is_err());
    }
}
