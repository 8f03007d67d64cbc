//! Cycle detector that drives a board to a stabilisation point.
//!
//! The detector advances the sparse engine one generation at a time while
//! checking for a fixed point (the next state equals the current one) and
//! for short-period oscillations (the next state matches an entry in a
//! bounded sliding history of fingerprints). If neither occurs within the
//! attempt ceiling, the run ends in a timeout.

use std::collections::VecDeque;

use lifegrid_core::Board;
use tracing::{debug, info};

use crate::config::DetectorConfig;
use crate::error::{DetectorError, DetectorResult};

/// Terminal state of a detector run.
///
/// The reported `generation` is always the generation whose board is
/// carried in the variant: generation 0 is the seed, and a seed that is
/// already a fixed point reports `Stable { generation: 0, .. }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The board equals its own next generation.
    Stable { generation: u64, board: Board },

    /// The board state recurred within the sliding history window;
    /// `period` is the distance in generations to the matching state.
    Oscillating {
        generation: u64,
        period: u64,
        board: Board,
    },

    /// The attempt ceiling was exhausted without finding a recurrence.
    Timeout { generation: u64, board: Board },
}

impl CycleOutcome {
    /// The terminal generation.
    pub fn generation(&self) -> u64 {
        match self {
            CycleOutcome::Stable { generation, .. }
            | CycleOutcome::Oscillating { generation, .. }
            | CycleOutcome::Timeout { generation, .. } => *generation,
        }
    }

    /// The terminal board state.
    pub fn board(&self) -> &Board {
        match self {
            CycleOutcome::Stable { board, .. }
            | CycleOutcome::Oscillating { board, .. }
            | CycleOutcome::Timeout { board, .. } => board,
        }
    }
}

/// Drives the sparse engine until stability, oscillation, or timeout.
#[derive(Debug, Clone)]
pub struct CycleDetector {
    config: DetectorConfig,
}

impl CycleDetector {
    /// Create a detector with the given configuration.
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// The detector configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the detector from `seed`, reporting each generation.
    ///
    /// `progress` is invoked synchronously, strictly in generation order
    /// 0, 1, 2, … up to and including the terminal generation; at most
    /// `max_attempts + 1` events are emitted. An error from the callback
    /// aborts the run and propagates to the caller.
    pub fn run<F>(&self, seed: Board, mut progress: F) -> DetectorResult<CycleOutcome>
    where
        F: FnMut(u64, &Board) -> DetectorResult<()>,
    {
        if self.config.max_attempts == 0 {
            return Err(DetectorError::InvalidMaxAttempts { value: 0 });
        }

        info!(
            max_attempts = self.config.max_attempts,
            live = seed.live_count(),
            "cycle_detection_start"
        );

        // Fingerprints of past states, tagged with their generation so the
        // oscillation period falls out as a subtraction.
        let mut history: VecDeque<(u64, String)> =
            VecDeque::with_capacity(self.config.history_window);

        let mut current = seed;
        let mut generation: u64 = 0;
        progress(generation, &current)?;

        loop {
            let next = current.next_generation();
            let current_fp = current.fingerprint();
            let next_fp = next.fingerprint();

            if current_fp == next_fp {
                info!(generation, "cycle_detection_stable");
                return Ok(CycleOutcome::Stable {
                    generation,
                    board: current,
                });
            }

            if let Some(matched) = history
                .iter()
                .find(|(_, fp)| *fp == next_fp)
                .map(|(gen, _)| *gen)
            {
                let candidate = generation + 1;
                let period = candidate - matched;
                progress(candidate, &next)?;
                info!(generation = candidate, period, "cycle_detection_oscillating");
                return Ok(CycleOutcome::Oscillating {
                    generation: candidate,
                    period,
                    board: next,
                });
            }

            if self.config.history_window > 0 {
                if history.len() == self.config.history_window {
                    history.pop_front();
                }
                history.push_back((generation, current_fp));
            }

            current = next;
            generation += 1;
            debug!(generation, live = current.live_count(), "generation_advanced");
            progress(generation, &current)?;

            if generation == self.config.max_attempts {
                info!(generation, "cycle_detection_timeout");
                return Ok(CycleOutcome::Timeout {
                    generation,
                    board: current,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid_core::Dimensions;

    fn board(matrix: &[&[u8]]) -> Board {
        let dense: Vec<Vec<u8>> = matrix.iter().map(|r| r.to_vec()).collect();
        Board::from_dense(&dense).unwrap()
    }

    fn run_collecting(
        detector: &CycleDetector,
        seed: Board,
    ) -> (DetectorResult<CycleOutcome>, Vec<u64>) {
        let mut generations = Vec::new();
        let result = detector.run(seed, |generation, _| {
            generations.push(generation);
            Ok(())
        });
        (result, generations)
    }

    #[test]
    fn test_block_is_stable_at_generation_zero() {
        let seed = board(&[&[0, 0, 0, 0], &[0, 1, 1, 0], &[0, 1, 1, 0], &[0, 0, 0, 0]]);
        let detector = CycleDetector::new(DetectorConfig::new(10));

        let (result, generations) = run_collecting(&detector, seed.clone());

        match result.unwrap() {
            CycleOutcome::Stable { generation, board } => {
                assert_eq!(generation, 0);
                assert_eq!(board, seed);
            }
            other => panic!("expected stable, got {other:?}"),
        }
        assert_eq!(generations, vec![0]);
    }

    #[test]
    fn test_blinker_reports_period_two() {
        let seed = board(&[
            &[0, 0, 0, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 0, 0, 0],
        ]);
        let horizontal = board(&[
            &[0, 0, 0, 0, 0],
            &[0, 0, 0, 0, 0],
            &[0, 1, 1, 1, 0],
            &[0, 0, 0, 0, 0],
            &[0, 0, 0, 0, 0],
        ]);
        let detector = CycleDetector::new(DetectorConfig::new(10));

        let mut states = Vec::new();
        let result = detector.run(seed.clone(), |generation, b| {
            states.push((generation, b.clone()));
            Ok(())
        });

        match result.unwrap() {
            CycleOutcome::Oscillating {
                generation,
                period,
                board,
            } => {
                assert_eq!(period, 2);
                assert_eq!(generation, 2);
                assert_eq!(board, seed);
            }
            other => panic!("expected oscillating, got {other:?}"),
        }

        assert_eq!(states[1], (1, horizontal));
        assert_eq!(states[2], (2, seed));
    }

    #[test]
    fn test_lone_cell_dies_into_a_fixed_point() {
        let seed = board(&[&[0, 0, 0], &[0, 1, 0], &[0, 0, 0]]);
        let detector = CycleDetector::new(DetectorConfig::new(10));

        let (result, generations) = run_collecting(&detector, seed);

        match result.unwrap() {
            CycleOutcome::Stable { generation, board } => {
                assert_eq!(generation, 1);
                assert_eq!(board.live_count(), 0);
            }
            other => panic!("expected stable, got {other:?}"),
        }
        assert_eq!(generations, vec![0, 1]);
    }

    #[test]
    fn test_glider_times_out() {
        // Glider in a rectangle large enough that it keeps travelling.
        let dims = Dimensions::new(20, 20).unwrap();
        let seed =
            Board::from_pairs([(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)], dims).unwrap();
        let detector = CycleDetector::new(DetectorConfig::new(5));

        let (result, generations) = run_collecting(&detector, seed);

        match result.unwrap() {
            CycleOutcome::Timeout { generation, board } => {
                assert_eq!(generation, 5);
                assert_eq!(board.live_count(), 5);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(generations, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_progress_events_are_bounded_and_ordered() {
        let dims = Dimensions::new(30, 30).unwrap();
        let seed =
            Board::from_pairs([(10, 11), (11, 12), (12, 10), (12, 11), (12, 12)], dims).unwrap();
        let max_attempts = 7;
        let detector = CycleDetector::new(DetectorConfig::new(max_attempts));

        let (result, generations) = run_collecting(&detector, seed);
        result.unwrap();

        assert!(generations.len() as u64 <= max_attempts + 1);
        let expected: Vec<u64> = (0..generations.len() as u64).collect();
        assert_eq!(generations, expected);
    }

    #[test]
    fn test_zero_max_attempts_rejected_before_progress() {
        let seed = board(&[&[1]]);
        let detector = CycleDetector::new(DetectorConfig::new(0));

        let mut called = false;
        let result = detector.run(seed, |_, _| {
            called = true;
            Ok(())
        });

        assert!(matches!(
            result,
            Err(DetectorError::InvalidMaxAttempts { value: 0 })
        ));
        assert!(!called);
    }

    #[test]
    fn test_callback_error_aborts_the_run() {
        let seed = board(&[&[0, 1, 0], &[0, 1, 0], &[0, 1, 0]]);
        let detector = CycleDetector::new(DetectorConfig::new(10));

        let result = detector.run(seed, |generation, _| {
            if generation >= 1 {
                Err(DetectorError::ProgressAborted {
                    generation,
                    message: "sink closed".into(),
                })
            } else {
                Ok(())
            }
        });

        assert!(matches!(
            result,
            Err(DetectorError::ProgressAborted { generation: 1, .. })
        ));
    }

    #[test]
    fn test_period_two_detected_at_minimal_window() {
        // A window of one entry is exactly enough to catch period 2.
        let seed = board(&[
            &[0, 0, 0, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 0, 0, 0],
        ]);
        let detector = CycleDetector::new(DetectorConfig::new(10).with_history_window(1));

        let (result, _) = run_collecting(&detector, seed);

        assert!(matches!(
            result.unwrap(),
            CycleOutcome::Oscillating { period: 2, .. }
        ));
    }

    #[test]
    fn test_empty_window_degrades_to_timeout() {
        // With no history there is nothing to match against, so the same
        // blinker runs straight to the attempt ceiling.
        let seed = board(&[
            &[0, 0, 0, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 0, 0, 0],
        ]);
        let detector = CycleDetector::new(DetectorConfig::new(4).with_history_window(0));

        let (result, _) = run_collecting(&detector, seed);

        assert!(matches!(
            result.unwrap(),
            CycleOutcome::Timeout { generation: 4, .. }
        ));
    }
}
