//! The Conway transition rule.

/// Decide whether a cell is alive in the next generation.
///
/// A live cell survives with 2 or 3 live neighbours; a dead cell is born
/// with exactly 3. Everything else is dead. Pure and total: no other
/// inputs, no state, no failure modes.
pub fn next_alive(is_alive: bool, live_neighbours: u8) -> bool {
    matches!(
        (is_alive, live_neighbours),
        (true, 2) | (true, 3) | (false, 3)
    )
}
