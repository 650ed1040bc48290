//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the staking ledger (custody, reward
//! issuance, condition authority, storage, time) is abstracted behind a
//! trait. This crate provides test-friendly implementations that:
//! - Keep all state in memory
//! - Can be controlled programmatically (injected failures, allowlists)
//! - Record what the ledger asked of them
//!
//! Usage: compose a ledger with [`null_collaborators`] in tests.

pub mod authority;
pub mod clock;
pub mod custody;
pub mod issuer;
pub mod store;

pub use authority::NullAuthority;
pub use clock::NullClock;
pub use custody::NullCustody;
pub use issuer::NullIssuer;
pub use store::NullStore;

use std::sync::Arc;
use vault_staking::Collaborators;
use vault_types::AccountId;

/// Handles to the nullables behind a [`Collaborators`] bundle, so tests can
/// drive and inspect them.
pub struct NullCollaborators {
    pub custody: Arc<NullCustody>,
    pub issuer: Arc<NullIssuer>,
    pub authority: Arc<NullAuthority>,
}

impl NullCollaborators {
    pub fn bundle(&self) -> Collaborators {
        Collaborators {
            custody: self.custody.clone(),
            issuer: self.issuer.clone(),
            authority: self.authority.clone(),
        }
    }
}

/// Fresh nullables with `custodian` holding staked units and `admin` as the
/// only account allowed to change conditions.
pub fn null_collaborators(custodian: &AccountId, admin: &AccountId) -> NullCollaborators {
    NullCollaborators {
        custody: Arc::new(NullCustody::new(custodian.clone())),
        issuer: Arc::new(NullIssuer::new()),
        authority: Arc::new(NullAuthority::allowing([admin.clone()])),
    }
}
