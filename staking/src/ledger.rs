//! The staking ledger: the public surface tying state, gate, custody,
//! reward issuance and notifications together.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, info, warn};
use vault_types::{AccountId, Timestamp, UnitId};

use crate::collaborators::{Collaborators, ReceiptAck, ReceiptPhase, UnitReceiver};
use crate::condition::{ConditionRecord, ConditionTimeline};
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::events::{EventBus, LedgerEvent};
use crate::gate::ReentrancyGate;
use crate::position::StakingPosition;
use crate::state::LedgerState;

/// Units staked by an account and the rewards it could claim right now.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StakeInfo {
    pub units: Vec<UnitId>,
    pub rewards: u128,
}

/// Custodial staking ledger.
///
/// Stake, withdraw and claim are serialized by a [`ReentrancyGate`]; a
/// concurrent or re-entrant attempt fails with `ReentrantCall`. The state
/// lock is never held across a collaborator call, so read-only queries stay
/// available to custody callbacks and other threads.
pub struct StakingLedger {
    config: LedgerConfig,
    state: RwLock<LedgerState>,
    gate: ReentrancyGate,
    events: EventBus,
    collaborators: Collaborators,
}

/// Receipt handler bound to the phase of the transfer the ledger initiated.
struct PhaseReceiver<'a> {
    ledger: &'a StakingLedger,
    phase: ReceiptPhase,
}

impl UnitReceiver for PhaseReceiver<'_> {
    fn on_unit_received(&self, operator: &AccountId, from: &AccountId, unit: UnitId) -> ReceiptAck {
        self.ledger.on_unit_received(operator, from, unit, self.phase)
    }
}

/// Transfers addressed to the ledger directly, outside any stake, are
/// unsolicited and always rejected.
impl UnitReceiver for StakingLedger {
    fn on_unit_received(&self, operator: &AccountId, from: &AccountId, unit: UnitId) -> ReceiptAck {
        StakingLedger::on_unit_received(self, operator, from, unit, ReceiptPhase::Unsolicited)
    }
}

impl StakingLedger {
    /// Build a ledger whose timeline starts with the configured condition.
    pub fn new(config: LedgerConfig, collaborators: Collaborators) -> Result<Self, LedgerError> {
        config.validate()?;
        let timeline = ConditionTimeline::with_initial(
            config.initial_time_unit,
            u128::from(config.initial_reward_rate),
            config.genesis,
        )?;
        Ok(Self::from_state(config, LedgerState::new(timeline), collaborators))
    }

    pub(crate) fn from_state(
        config: LedgerConfig,
        state: LedgerState,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            config,
            state: RwLock::new(state),
            gate: ReentrancyGate::new(),
            events: EventBus::new(),
            collaborators,
        }
    }

    /// Register a notification listener. Listeners must be added before the
    /// ledger is shared.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub(crate) fn gate(&self) -> &ReentrancyGate {
        &self.gate
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.state.read().map_err(|_| LedgerError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.state.write().map_err(|_| LedgerError::Poisoned)
    }

    // ── Mutating entry points ──────────────────────────────────────────

    /// Pull `units` from `caller` into custody and stake them.
    ///
    /// Every unit is transferred before the ledger commits. If any transfer
    /// fails, the units already pulled in are returned and nothing is
    /// recorded.
    pub fn stake(&self, caller: &AccountId, units: &[UnitId], now: Timestamp) -> Result<(), LedgerError> {
        let _entry = self.gate.enter()?;
        self.read()?.validate_stake(units)?;

        let receiver = PhaseReceiver {
            ledger: self,
            phase: ReceiptPhase::Staking,
        };
        for (i, &unit) in units.iter().enumerate() {
            if let Err(e) = self.collaborators.custody.transfer_in(caller, unit, &receiver) {
                warn!(account = %caller, %unit, error = %e, "custody transfer-in failed, rolling back");
                self.release_units(caller, &units[..i]);
                return Err(LedgerError::CustodyTransferFailed {
                    unit,
                    reason: e.to_string(),
                });
            }
        }

        let committed = self
            .write()
            .and_then(|mut state| state.apply_stake(caller, units, now));
        let earned = match committed {
            Ok(earned) => earned,
            Err(e) => {
                self.release_units(caller, units);
                return Err(e);
            }
        };

        info!(account = %caller, units = units.len(), earned, "units staked");
        self.events.emit(&LedgerEvent::UnitsStaked {
            staker: caller.clone(),
            units: units.to_vec(),
        });
        Ok(())
    }

    /// Unstake `units` and release them from custody to `caller`.
    ///
    /// Every unit is released before the ledger commits. If any release
    /// fails, the units already released are pulled back and nothing is
    /// recorded.
    pub fn withdraw(&self, caller: &AccountId, units: &[UnitId], now: Timestamp) -> Result<(), LedgerError> {
        let _entry = self.gate.enter()?;
        self.read()?.validate_withdraw(caller, units)?;

        for (i, &unit) in units.iter().enumerate() {
            if let Err(e) = self.collaborators.custody.transfer_out(caller, unit) {
                warn!(account = %caller, %unit, error = %e, "custody transfer-out failed, rolling back");
                self.reclaim_units(caller, &units[..i]);
                return Err(LedgerError::CustodyTransferFailed {
                    unit,
                    reason: e.to_string(),
                });
            }
        }

        let committed = self
            .write()
            .and_then(|mut state| state.apply_withdraw(caller, units, now));
        let earned = match committed {
            Ok(earned) => earned,
            Err(e) => {
                self.reclaim_units(caller, units);
                return Err(e);
            }
        };

        info!(account = %caller, units = units.len(), earned, "units withdrawn");
        self.events.emit(&LedgerEvent::UnitsWithdrawn {
            staker: caller.clone(),
            units: units.to_vec(),
        });
        Ok(())
    }

    /// Pay out everything `caller` is owed. Returns the amount paid.
    pub fn claim_rewards(&self, caller: &AccountId, now: Timestamp) -> Result<u128, LedgerError> {
        let _entry = self.gate.enter()?;
        let total = self.write()?.apply_claim(caller, now)?;

        self.collaborators.issuer.mint(caller, total);

        info!(account = %caller, amount = total, "rewards claimed");
        self.events.emit(&LedgerEvent::RewardsClaimed {
            staker: caller.clone(),
            amount: total,
        });
        Ok(total)
    }

    /// Start a new condition with `value` as its time unit.
    pub fn set_time_unit(&self, caller: &AccountId, value: u64, now: Timestamp) -> Result<(), LedgerError> {
        self.require_authority(caller)?;
        let (id, old) = self.write()?.timeline.set_time_unit(value, now)?;

        info!(condition = id, old, new = value, "time unit updated");
        self.events
            .emit(&LedgerEvent::TimeUnitUpdated { old, new: value });
        Ok(())
    }

    /// Start a new condition with `value` as its reward rate.
    pub fn set_reward_rate(&self, caller: &AccountId, value: u128, now: Timestamp) -> Result<(), LedgerError> {
        self.require_authority(caller)?;
        let (id, old) = self.write()?.timeline.set_rate(value, now)?;

        info!(condition = id, old, new = value, "reward rate updated");
        self.events
            .emit(&LedgerEvent::RewardRateUpdated { old, new: value });
        Ok(())
    }

    // ── Custody receipt ────────────────────────────────────────────────

    /// Acknowledge a unit arriving in custody.
    ///
    /// Accepted only while the ledger itself is pulling units in: a stake in
    /// progress or a withdraw rollback. Anything else is an unsolicited
    /// transfer.
    pub fn on_unit_received(
        &self,
        operator: &AccountId,
        from: &AccountId,
        unit: UnitId,
        phase: ReceiptPhase,
    ) -> ReceiptAck {
        match phase {
            ReceiptPhase::Staking | ReceiptPhase::Rollback => {
                debug!(%operator, %from, %unit, ?phase, "custody receipt accepted");
                ReceiptAck::Accepted
            }
            ReceiptPhase::Unsolicited => {
                warn!(%operator, %from, %unit, "rejecting unsolicited custody transfer");
                ReceiptAck::Rejected
            }
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn get_stake_info(&self, account: &AccountId, now: Timestamp) -> Result<StakeInfo, LedgerError> {
        let state = self.read()?;
        Ok(StakeInfo {
            units: state.tokens.units_of(account).to_vec(),
            rewards: state.available_rewards(account, now)?,
        })
    }

    pub fn available_rewards(&self, account: &AccountId, now: Timestamp) -> Result<u128, LedgerError> {
        self.read()?.available_rewards(account, now)
    }

    pub fn get_time_unit(&self) -> Result<u64, LedgerError> {
        Ok(self.read()?.timeline.current_time_unit())
    }

    pub fn get_reward_rate(&self) -> Result<u128, LedgerError> {
        Ok(self.read()?.timeline.current_rate())
    }

    /// The open condition record.
    pub fn current_condition(&self) -> Result<Option<ConditionRecord>, LedgerError> {
        Ok(self.read()?.timeline.current().cloned())
    }

    /// Every condition record, oldest first.
    pub fn conditions(&self) -> Result<Vec<ConditionRecord>, LedgerError> {
        Ok(self.read()?.timeline.records().to_vec())
    }

    pub fn position(&self, account: &AccountId) -> Result<Option<StakingPosition>, LedgerError> {
        Ok(self.read()?.positions.get(account).cloned())
    }

    pub fn owner_of(&self, unit: UnitId) -> Result<Option<AccountId>, LedgerError> {
        Ok(self.read()?.tokens.owner_of(unit).cloned())
    }

    /// Number of units currently staked across all accounts.
    pub fn total_staked(&self) -> Result<u64, LedgerError> {
        Ok(self.read()?.tokens.staked_count() as u64)
    }

    /// Reward balance the issuer reports. Informational only.
    pub fn reward_balance_available(&self) -> u128 {
        self.collaborators.issuer.balance_available()
    }

    /// Whether positions and the token index agree with each other.
    pub fn is_consistent(&self) -> Result<bool, LedgerError> {
        Ok(self.read()?.is_consistent())
    }

    // ── Internal helpers ───────────────────────────────────────────────

    fn require_authority(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if !self.collaborators.authority.can_change_conditions(caller) {
            warn!(account = %caller, "unauthorized condition change");
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    /// Undo transfer-ins of an aborted stake.
    fn release_units(&self, owner: &AccountId, units: &[UnitId]) {
        for &unit in units {
            if let Err(e) = self.collaborators.custody.transfer_out(owner, unit) {
                error!(account = %owner, %unit, error = %e, "failed to return unit after aborted stake");
            }
        }
    }

    /// Undo transfer-outs of an aborted withdraw.
    fn reclaim_units(&self, owner: &AccountId, units: &[UnitId]) {
        let receiver = PhaseReceiver {
            ledger: self,
            phase: ReceiptPhase::Rollback,
        };
        for &unit in units {
            if let Err(e) = self.collaborators.custody.transfer_in(owner, unit, &receiver) {
                error!(account = %owner, %unit, error = %e, "failed to reclaim unit after aborted withdraw");
            }
        }
    }
}
