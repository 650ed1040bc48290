//! Ledger errors.
//!
//! Every variant is a whole-operation rejection: when a call returns one of
//! these, the ledger state is exactly what it was before the call.

use thiserror::Error;
use vault_store::StoreError;
use vault_types::{Timestamp, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("unit list must not be empty")]
    EmptyUnitList,

    #[error("insufficient staked balance: requested {requested}, staked {staked}")]
    InsufficientStakedBalance { requested: u64, staked: u64 },

    #[error("unit {unit} is not staked by the caller")]
    NotTokenOwner { unit: UnitId },

    #[error("unit {unit} is already staked or listed twice")]
    DuplicateUnit { unit: UnitId },

    #[error("new value equals the current staking condition")]
    UnchangedValue,

    #[error("time unit must be non-zero")]
    ZeroTimeUnit,

    #[error("no rewards owed")]
    NoRewardsOwed,

    #[error("caller is not authorized to change staking conditions")]
    Unauthorized,

    #[error("a mutating ledger call is already in progress")]
    ReentrantCall,

    #[error("custody transfer of unit {unit} failed: {reason}")]
    CustodyTransferFailed { unit: UnitId, reason: String },

    #[error("timestamp {0} precedes the last recorded boundary")]
    InvalidTimestamp(Timestamp),

    #[error("arithmetic overflow in reward computation")]
    Overflow,

    #[error("config error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("ledger state lock poisoned")]
    Poisoned,
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        LedgerError::Store(e.to_string())
    }
}
