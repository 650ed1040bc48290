//! Mutual exclusion for mutating ledger calls.
//!
//! Stake, withdraw and claim each hold the gate for their whole duration.
//! A second attempt while the gate is held fails immediately instead of
//! blocking, which is what turns a custody callback that tries to re-enter
//! the ledger into a `ReentrantCall` error.

use crate::error::LedgerError;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct ReentrancyGate {
    locked: AtomicBool,
}

impl ReentrancyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the gate. The returned guard reopens it when dropped, on every
    /// exit path including early returns and unwinding.
    pub fn enter(&self) -> Result<GateGuard<'_>, LedgerError> {
        self.locked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LedgerError::ReentrantCall)?;
        Ok(GateGuard { gate: self })
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }
}

/// Proof that the holder is the only mutating call in progress.
#[must_use = "the gate reopens as soon as the guard is dropped"]
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a ReentrancyGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.locked.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_entry_is_rejected_until_guard_drops() {
        let gate = ReentrancyGate::new();
        let guard = gate.enter().unwrap();
        assert!(gate.is_locked());
        assert_eq!(gate.enter().unwrap_err(), LedgerError::ReentrantCall);
        drop(guard);
        assert!(!gate.is_locked());
        assert!(gate.enter().is_ok());
    }

    #[test]
    fn early_return_reopens_gate() {
        fn failing_call(gate: &ReentrancyGate) -> Result<(), LedgerError> {
            let _entry = gate.enter()?;
            Err(LedgerError::NoRewardsOwed)
        }
        let gate = ReentrancyGate::new();
        assert_eq!(failing_call(&gate), Err(LedgerError::NoRewardsOwed));
        assert!(!gate.is_locked());
    }

    #[test]
    fn panic_reopens_gate() {
        let gate = ReentrancyGate::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _entry = gate.enter().unwrap();
            panic!("collaborator blew up");
        }));
        assert!(result.is_err());
        assert!(!gate.is_locked());
    }
}
