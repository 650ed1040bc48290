//! Notifications emitted by the ledger after each committed change.

use vault_types::{AccountId, UnitId};

/// Ledger-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Units were pulled into custody and indexed to the staker.
    UnitsStaked {
        staker: AccountId,
        units: Vec<UnitId>,
    },
    /// Units were released from custody back to the staker.
    UnitsWithdrawn {
        staker: AccountId,
        units: Vec<UnitId>,
    },
    /// Unclaimed rewards were paid out.
    RewardsClaimed { staker: AccountId, amount: u128 },
    /// A new condition record changed the time unit.
    TimeUnitUpdated { old: u64, new: u64 },
    /// A new condition record changed the reward rate.
    RewardRateUpdated { old: u128, new: u128 },
}

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline on the emitting thread after the ledger has
/// released its state lock; keep handlers fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
