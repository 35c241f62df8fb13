//! Clock abstraction for debounce and load-timeout deadlines

use std::time::Instant;

/// Time source injected into the session and the search overlay
///
/// Production code uses [`SystemClock`]; tests substitute a manually
/// advanced clock to drive deadlines deterministically.
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
