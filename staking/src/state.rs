//! The ledger's complete in-memory state and its atomic transitions.
//!
//! Each `apply_*` method validates everything that can fail before it
//! writes anything, so an `Err` always leaves the state untouched.

use crate::condition::ConditionTimeline;
use crate::error::LedgerError;
use crate::position::PositionBook;
use crate::token_index::TokenIndex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vault_types::{AccountId, Timestamp, UnitId};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LedgerState {
    pub timeline: ConditionTimeline,
    pub positions: PositionBook,
    pub tokens: TokenIndex,
}

impl LedgerState {
    pub fn new(timeline: ConditionTimeline) -> Self {
        Self {
            timeline,
            positions: PositionBook::new(),
            tokens: TokenIndex::new(),
        }
    }

    /// Reject a stake request before any unit is moved.
    pub fn validate_stake(&self, units: &[UnitId]) -> Result<(), LedgerError> {
        if units.is_empty() {
            return Err(LedgerError::EmptyUnitList);
        }
        self.tokens.ensure_unstaked(units)
    }

    /// Reject a withdraw request before any unit is moved.
    pub fn validate_withdraw(&self, account: &AccountId, units: &[UnitId]) -> Result<(), LedgerError> {
        if units.is_empty() {
            return Err(LedgerError::EmptyUnitList);
        }
        let staked = self.positions.staked(account);
        if units.len() as u64 > staked {
            return Err(LedgerError::InsufficientStakedBalance {
                requested: units.len() as u64,
                staked,
            });
        }
        self.tokens.ensure_owned(account, units)
    }

    /// Index `units` to `account` and grow its position. Returns the reward
    /// folded in by the checkpoint.
    pub fn apply_stake(
        &mut self,
        account: &AccountId,
        units: &[UnitId],
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        self.validate_stake(units)?;
        let earned = self
            .positions
            .stake(account, units.len() as u64, &self.timeline, now)?;
        for &unit in units {
            self.tokens.index_on_stake(account, unit)?;
        }
        debug!(%account, units = units.len(), earned, "stake applied");
        Ok(earned)
    }

    /// De-index `units` from `account` and shrink its position. Returns the
    /// reward folded in by the checkpoint.
    pub fn apply_withdraw(
        &mut self,
        account: &AccountId,
        units: &[UnitId],
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        self.validate_withdraw(account, units)?;
        let earned = self
            .positions
            .withdraw(account, units.len() as u64, &self.timeline, now)?;
        for &unit in units {
            self.tokens.deindex_on_withdraw(account, unit)?;
        }
        if !self.positions.is_active(account) {
            self.tokens.clear_account(account);
        }
        debug!(%account, units = units.len(), earned, "withdraw applied");
        Ok(earned)
    }

    /// Checkpoint and zero the account's rewards, returning the payout.
    pub fn apply_claim(&mut self, account: &AccountId, now: Timestamp) -> Result<u128, LedgerError> {
        self.positions.claim(account, &self.timeline, now)
    }

    pub fn available_rewards(&self, account: &AccountId, now: Timestamp) -> Result<u128, LedgerError> {
        self.positions.available_rewards(account, &self.timeline, now)
    }

    /// Σ amount_staked equals the number of owned units, and every account's
    /// enumeration has exactly as many units as its position claims.
    pub fn is_consistent(&self) -> bool {
        if self.positions.total_staked() != self.tokens.staked_count() as u64 {
            return false;
        }
        self.positions.iter().all(|(account, position)| {
            let units = self.tokens.units_of(account);
            units.len() as u64 == position.amount_staked
                && units.iter().all(|&u| self.tokens.owner_of(u) == Some(account))
        })
    }
}
