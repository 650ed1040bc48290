//! Per-account staking positions.
//!
//! A position is Inactive while `amount_staked == 0` and Active otherwise.
//! `unclaimed_rewards` survives every transition, so positions are never
//! deleted.

use crate::accrual;
use crate::condition::{ConditionId, ConditionTimeline};
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vault_types::{AccountId, Timestamp};

/// Staking state for a single account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingPosition {
    /// Number of units currently staked by the account.
    pub amount_staked: u64,
    /// Rewards folded in by past checkpoints and not yet claimed.
    pub unclaimed_rewards: u128,
    /// Reference point of the next accrual interval.
    pub last_update: Timestamp,
    /// Condition record that was current at `last_update`.
    pub checkpoint_condition_id: ConditionId,
}

impl StakingPosition {
    pub fn is_active(&self) -> bool {
        self.amount_staked > 0
    }

    /// Fold accrual over `[last_update, now)` into `unclaimed_rewards` and
    /// move the reference point to `now`. Returns the amount folded in.
    pub fn checkpoint(
        &mut self,
        timeline: &ConditionTimeline,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        if now < self.last_update {
            return Err(LedgerError::InvalidTimestamp(now));
        }
        let earned = accrual::settle(self, timeline, now)?;
        self.unclaimed_rewards = self
            .unclaimed_rewards
            .checked_add(earned)
            .ok_or(LedgerError::Overflow)?;
        self.anchor(timeline, now);
        Ok(earned)
    }

    /// Move the reference point to `now` without settling anything.
    fn anchor(&mut self, timeline: &ConditionTimeline, now: Timestamp) {
        self.last_update = now;
        self.checkpoint_condition_id = timeline.anchor_id();
    }

    /// Unclaimed rewards plus whatever has accrued since the last checkpoint.
    pub fn available_rewards(
        &self,
        timeline: &ConditionTimeline,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        if !self.is_active() {
            return Ok(self.unclaimed_rewards);
        }
        self.unclaimed_rewards
            .checked_add(accrual::settle(self, timeline, now)?)
            .ok_or(LedgerError::Overflow)
    }
}

/// All staking positions, keyed by account.
///
/// Every mutating method works on a copy of the position and writes it back
/// only once every fallible step has succeeded.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PositionBook {
    positions: HashMap<AccountId, StakingPosition>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, account: &AccountId) -> Option<&StakingPosition> {
        self.positions.get(account)
    }

    pub fn is_active(&self, account: &AccountId) -> bool {
        self.get(account).is_some_and(StakingPosition::is_active)
    }

    pub fn staked(&self, account: &AccountId) -> u64 {
        self.get(account).map(|p| p.amount_staked).unwrap_or(0)
    }

    /// Add `count` units to the account's position.
    ///
    /// An Active position is checkpointed first; an Inactive one is simply
    /// re-anchored at `now` since there is no elapsed interval to integrate.
    /// Returns the reward folded in by the checkpoint.
    pub fn stake(
        &mut self,
        account: &AccountId,
        count: u64,
        timeline: &ConditionTimeline,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        if count == 0 {
            return Err(LedgerError::EmptyUnitList);
        }
        let mut position = self.get(account).cloned().unwrap_or_default();
        let earned = if position.is_active() {
            position.checkpoint(timeline, now)?
        } else {
            position.anchor(timeline, now);
            0
        };
        position.amount_staked = position
            .amount_staked
            .checked_add(count)
            .ok_or(LedgerError::Overflow)?;
        self.positions.insert(account.clone(), position);
        Ok(earned)
    }

    /// Remove `count` units from the account's position after checkpointing.
    pub fn withdraw(
        &mut self,
        account: &AccountId,
        count: u64,
        timeline: &ConditionTimeline,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        if count == 0 {
            return Err(LedgerError::EmptyUnitList);
        }
        let mut position = self.get(account).cloned().unwrap_or_default();
        if count > position.amount_staked {
            return Err(LedgerError::InsufficientStakedBalance {
                requested: count,
                staked: position.amount_staked,
            });
        }
        let earned = position.checkpoint(timeline, now)?;
        position.amount_staked -= count;
        self.positions.insert(account.clone(), position);
        Ok(earned)
    }

    /// Checkpoint and zero the account's unclaimed rewards, returning the
    /// amount to pay out.
    pub fn claim(
        &mut self,
        account: &AccountId,
        timeline: &ConditionTimeline,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        let mut position = self.get(account).cloned().unwrap_or_default();
        if position.is_active() {
            position.checkpoint(timeline, now)?;
        }
        let total = position.unclaimed_rewards;
        if total == 0 {
            return Err(LedgerError::NoRewardsOwed);
        }
        position.unclaimed_rewards = 0;
        self.positions.insert(account.clone(), position);
        Ok(total)
    }

    pub fn available_rewards(
        &self,
        account: &AccountId,
        timeline: &ConditionTimeline,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        match self.get(account) {
            Some(position) => position.available_rewards(timeline, now),
            None => Ok(0),
        }
    }

    /// Sum of `amount_staked` over every account.
    pub fn total_staked(&self) -> u64 {
        self.positions.values().map(|p| p.amount_staked).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &StakingPosition)> {
        self.positions.iter()
    }

    /// Restore a persisted position.
    pub fn insert(&mut self, account: AccountId, position: StakingPosition) {
        self.positions.insert(account, position);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
