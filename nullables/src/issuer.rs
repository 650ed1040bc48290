//! Nullable reward issuer: records every payout in memory.

use std::collections::HashMap;
use std::sync::Mutex;

use vault_staking::RewardIssuer;
use vault_types::AccountId;

/// A reward issuer for testing.
///
/// `balance_available` starts at the funded amount and goes down with each
/// mint, saturating at zero; minting never fails even when unfunded.
pub struct NullIssuer {
    funded: Mutex<u128>,
    minted: Mutex<HashMap<AccountId, u128>>,
}

impl NullIssuer {
    pub fn new() -> Self {
        Self::funded(0)
    }

    pub fn funded(balance: u128) -> Self {
        Self {
            funded: Mutex::new(balance),
            minted: Mutex::new(HashMap::new()),
        }
    }

    /// Total ever minted to `account`.
    pub fn minted_to(&self, account: &AccountId) -> u128 {
        self.minted.lock().unwrap().get(account).copied().unwrap_or(0)
    }

    /// Total ever minted to anyone.
    pub fn total_minted(&self) -> u128 {
        self.minted.lock().unwrap().values().sum()
    }
}

impl Default for NullIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardIssuer for NullIssuer {
    fn mint(&self, to: &AccountId, amount: u128) {
        *self.minted.lock().unwrap().entry(to.clone()).or_insert(0) += amount;
        let mut funded = self.funded.lock().unwrap();
        *funded = funded.saturating_sub(amount);
    }

    fn balance_available(&self) -> u128 {
        *self.funded.lock().unwrap()
    }
}
