//! Ownership index of staked asset units.
//!
//! Two views kept in lockstep: unit → owner, and owner → ordered list of
//! units. The per-owner list supports O(1) removal by swapping the removed
//! slot with the last entry, so it never reports a unit the account no
//! longer owns.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use vault_types::{AccountId, UnitId};

/// Units staked by one account, with a slot map for O(1) membership and
/// removal.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct OwnedUnits {
    units: Vec<UnitId>,
    slots: HashMap<UnitId, usize>,
}

impl OwnedUnits {
    /// Returns false if the unit was already listed.
    fn insert(&mut self, unit: UnitId) -> bool {
        if self.slots.contains_key(&unit) {
            return false;
        }
        self.slots.insert(unit, self.units.len());
        self.units.push(unit);
        true
    }

    fn remove(&mut self, unit: UnitId) -> bool {
        let Some(slot) = self.slots.remove(&unit) else {
            return false;
        };
        self.units.swap_remove(slot);
        if let Some(moved) = self.units.get(slot) {
            self.slots.insert(*moved, slot);
        }
        true
    }

    fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenIndex {
    owners: HashMap<UnitId, AccountId>,
    by_owner: HashMap<AccountId, OwnedUnits>,
}

impl TokenIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `account` as the owner of `unit`.
    ///
    /// Re-indexing a unit the account already owns is a no-op; a unit owned
    /// by anyone else is rejected.
    pub fn index_on_stake(&mut self, account: &AccountId, unit: UnitId) -> Result<(), LedgerError> {
        match self.owners.get(&unit) {
            Some(owner) if owner == account => return Ok(()),
            Some(_) => return Err(LedgerError::DuplicateUnit { unit }),
            None => {}
        }
        self.owners.insert(unit, account.clone());
        self.by_owner.entry(account.clone()).or_default().insert(unit);
        Ok(())
    }

    /// Clear `account`'s ownership of `unit` and drop it from the account's
    /// list.
    pub fn deindex_on_withdraw(
        &mut self,
        account: &AccountId,
        unit: UnitId,
    ) -> Result<(), LedgerError> {
        if self.owners.get(&unit) != Some(account) {
            return Err(LedgerError::NotTokenOwner { unit });
        }
        self.owners.remove(&unit);
        if let Some(owned) = self.by_owner.get_mut(account) {
            owned.remove(unit);
            if owned.is_empty() {
                self.by_owner.remove(account);
            }
        }
        Ok(())
    }

    /// Drop the account's enumeration list entirely. Called when its staked
    /// balance reaches zero.
    pub fn clear_account(&mut self, account: &AccountId) {
        if let Some(owned) = self.by_owner.remove(account) {
            for unit in owned.units {
                if self.owners.get(&unit) == Some(account) {
                    self.owners.remove(&unit);
                }
            }
        }
    }

    /// Fail unless every unit is currently owned by `account`, each listed
    /// once.
    pub fn ensure_owned(&self, account: &AccountId, units: &[UnitId]) -> Result<(), LedgerError> {
        let mut seen = HashSet::with_capacity(units.len());
        for &unit in units {
            if !seen.insert(unit) || self.owners.get(&unit) != Some(account) {
                return Err(LedgerError::NotTokenOwner { unit });
            }
        }
        Ok(())
    }

    /// Fail if any unit is already staked or listed twice.
    pub fn ensure_unstaked(&self, units: &[UnitId]) -> Result<(), LedgerError> {
        let mut seen = HashSet::with_capacity(units.len());
        for &unit in units {
            if !seen.insert(unit) || self.owners.contains_key(&unit) {
                return Err(LedgerError::DuplicateUnit { unit });
            }
        }
        Ok(())
    }

    pub fn owner_of(&self, unit: UnitId) -> Option<&AccountId> {
        self.owners.get(&unit)
    }

    /// Units staked by `account`, in index order.
    pub fn units_of(&self, account: &AccountId) -> &[UnitId] {
        self.by_owner
            .get(account)
            .map(|owned| owned.units.as_slice())
            .unwrap_or(&[])
    }

    /// Number of units that currently have an owner.
    pub fn staked_count(&self) -> usize {
        self.owners.len()
    }
}
