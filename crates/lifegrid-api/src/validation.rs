//! Boundary validation for identifiers, seed matrices, and attempt counts.

/// Upper bound on `maxAttempts` accepted at the API boundary.
pub const MAX_ATTEMPTS_LIMIT: u64 = 100_000;

/// Whether a string is a lowercase hyphenated UUID.
///
/// Board ids are minted in this exact form and anything else is rejected
/// before touching a backend.
pub fn is_board_id(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        8 | 13 | 18 | 23 => *b == b'-',
        _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
    })
}

/// Validate a dense seed matrix: non-empty, rectangular, cells in {0, 1}.
pub fn validate_board_matrix(matrix: &[Vec<u8>]) -> Result<(), String> {
    if matrix.is_empty() || matrix[0].is_empty() {
        return Err("board must be a non-empty matrix".to_string());
    }

    let cols = matrix[0].len();
    for (row, values) in matrix.iter().enumerate() {
        if values.len() != cols {
            return Err(format!(
                "board must be rectangular: row {row} has {} cells, expected {cols}",
                values.len()
            ));
        }
        if let Some(col) = values.iter().position(|v| *v > 1) {
            return Err(format!(
                "board cells must be 0 or 1 (found {} at row {row}, col {col})",
                values[col]
            ));
        }
    }
    Ok(())
}

/// Parse a `{generation}` path segment.
///
/// Parsed here rather than by the path extractor so that non-numeric
/// segments get the standard failure envelope; `0` passes through and is
/// rejected by the repository.
pub fn parse_generation(raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .map_err(|_| format!("generation must be a non-negative integer (got {raw:?})"))
}

/// Validate an attempt ceiling, returning it as unsigned.
pub fn validate_max_attempts(value: i64) -> Result<u64, String> {
    if value < 1 || value as u64 > MAX_ATTEMPTS_LIMIT {
        return Err(format!(
            "maxAttempts must be between 1 and {MAX_ATTEMPTS_LIMIT} (got {value})"
        ));
    }
    Ok(value as u64)
}
