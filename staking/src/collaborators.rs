//! External collaborators the ledger is composed with.
//!
//! The ledger never moves assets or mints rewards itself. Concrete
//! implementations are injected at construction as trait objects; tests use
//! the in-memory ones from `vault-nullables`.

use std::sync::Arc;
use thiserror::Error;
use vault_types::{AccountId, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CustodyError {
    #[error("unit {unit} is not held by {expected}")]
    NotOwner { unit: UnitId, expected: AccountId },

    #[error("receiver rejected unit {unit}")]
    Rejected { unit: UnitId },

    #[error("caller is not authorized to move unit {unit}")]
    Unauthorized { unit: UnitId },

    #[error("{0}")]
    Other(String),
}

/// What the ledger is doing when a custody receipt arrives.
///
/// Passed explicitly into the receipt handler so a receipt is accepted only
/// when the ledger itself initiated the transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptPhase {
    /// No transfer-in was requested by the ledger.
    Unsolicited,
    /// A stake is pulling units into custody.
    Staking,
    /// A failed withdraw is pulling already-released units back.
    Rollback,
}

/// Canonical answer to a custody receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptAck {
    Accepted,
    Rejected,
}

/// Receives the acknowledgment callback a custody transfer-in makes
/// synchronously, before the transfer completes.
pub trait UnitReceiver {
    fn on_unit_received(&self, operator: &AccountId, from: &AccountId, unit: UnitId) -> ReceiptAck;
}

/// Owns and moves asset units.
pub trait AssetCustody: Send + Sync {
    /// Move `unit` from `from` into custody. Must call
    /// `receiver.on_unit_received` and fail with `Rejected` unless it answers
    /// `Accepted`.
    fn transfer_in(
        &self,
        from: &AccountId,
        unit: UnitId,
        receiver: &dyn UnitReceiver,
    ) -> Result<(), CustodyError>;

    /// Move `unit` out of custody to `to`.
    fn transfer_out(&self, to: &AccountId, unit: UnitId) -> Result<(), CustodyError>;
}

/// Delivers reward payouts.
///
/// `mint` has no failure path. Nothing checks issued amounts against
/// `balance_available`; over-issuance is the issuer's concern.
pub trait RewardIssuer: Send + Sync {
    fn mint(&self, to: &AccountId, amount: u128);

    /// Informational only.
    fn balance_available(&self) -> u128;
}

/// Decides who may change the staking conditions.
pub trait ConditionAuthority: Send + Sync {
    fn can_change_conditions(&self, caller: &AccountId) -> bool;
}

/// The collaborator bundle a ledger is constructed with.
#[derive(Clone)]
pub struct Collaborators {
    pub custody: Arc<dyn AssetCustody>,
    pub issuer: Arc<dyn RewardIssuer>,
    pub authority: Arc<dyn ConditionAuthority>,
}
