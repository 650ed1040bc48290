//! Custodial staking ledger.
//!
//! Accounts deposit uniquely-identified asset units and earn rewards that
//! accrue under a sequence of global reward-rate regimes ("conditions").
//!
//! `reward(segment) = floor(duration × units_staked × rate / time_unit)`
//!
//! This crate handles:
//! - The append-only condition timeline
//! - Accrual: integrating a position against the timeline, one truncating
//!   division per regime segment
//! - Per-account positions and the per-unit ownership index
//! - The reentrancy gate and custody-receipt phases that keep
//!   stake/withdraw/claim atomic and mutually exclusive

pub mod accrual;
pub mod collaborators;
pub mod condition;
pub mod config;
pub mod error;
pub mod events;
pub mod gate;
pub mod ledger;
pub mod persist;
pub mod position;
pub mod state;
pub mod token_index;

pub use accrual::{settle, SegmentAccrual};
pub use collaborators::{
    AssetCustody, Collaborators, ConditionAuthority, CustodyError, ReceiptAck, ReceiptPhase,
    RewardIssuer, UnitReceiver,
};
pub use condition::{ConditionId, ConditionRecord, ConditionTimeline};
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use events::{EventBus, LedgerEvent};
pub use gate::{GateGuard, ReentrancyGate};
pub use ledger::{StakeInfo, StakingLedger};
pub use position::{PositionBook, StakingPosition};
pub use state::LedgerState;
pub use token_index::TokenIndex;
