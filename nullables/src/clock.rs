//! Nullable clock: deterministic time for testing.

use std::cell::Cell;
use vault_types::Timestamp;

/// A deterministic clock for testing.
///
/// The ledger takes `now` as an argument; tests read it from here so that
/// sequences of calls advance time explicitly.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    /// Advance time by a number of seconds and return the new time.
    pub fn advance(&self, secs: u64) -> Timestamp {
        let next = self.now().plus(secs);
        self.current.set(next.as_secs());
        next
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current.set(secs);
    }
}
