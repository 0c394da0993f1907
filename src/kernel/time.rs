use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Milliseconds on the pipeline's monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp {
    pub ms: u64,
}

/// Driver cadence for draining kernel events.
pub const TICK_MS: u64 = 20;

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp { ms: 0 };

    pub fn from_millis(ms: u64) -> Self {
        Timestamp { ms }
    }

    /// Milliseconds since `earlier`, zero if `earlier` is in the future.
    pub fn since(&self, earlier: Timestamp) -> u64 {
        self.ms.saturating_sub(earlier.ms)
    }
}

/// Source of `Timestamp`s relative to process start.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp { ms: self.origin.elapsed().as_millis() as u64 }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
