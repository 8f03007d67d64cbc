//! Configuration for the cycle detector.

use serde::{Deserialize, Serialize};

/// Configuration for a detector run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Maximum generations to advance before reporting a timeout.
    pub max_attempts: u64,

    /// Sliding window of state fingerprints kept for oscillation checks.
    ///
    /// The default of 20 covers every natural short-period oscillator
    /// (blinker 2, toad 2, beacon 2, pulsar 3, pentadecathlon 15); longer
    /// periods degrade to a timeout.
    pub history_window: usize,
}

impl DetectorConfig {
    /// Default history window size.
    pub const DEFAULT_HISTORY_WINDOW: usize = 20;

    /// Config with the given attempt ceiling and the default window.
    pub fn new(max_attempts: u64) -> Self {
        Self {
            max_attempts,
            history_window: Self::DEFAULT_HISTORY_WINDOW,
        }
    }

    /// Override the history window (builder pattern).
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// A config for quick interactive runs.
    pub fn quick() -> Self {
        Self::new(100)
    }

    /// A config for exhaustive searches at the service's attempt ceiling.
    pub fn exhaustive() -> Self {
        Self::new(100_000)
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new(1_000)
    }
}
