//! Wall-clock timing for scenarios.

use std::time::{Duration, Instant};

/// Stopwatch started at construction.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time elapsed since [`Stopwatch::start`]. Can be read more than once.
    pub fn stop(&self) -> Duration {
        self.started.elapsed()
    }
}
