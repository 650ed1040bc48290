//! Abstract storage traits for the vault staking ledger.
//!
//! Every storage backend (embedded database, in-memory for testing)
//! implements these traits. The ledger depends only on the traits and
//! serializes its own types into opaque byte blobs, so this crate never
//! depends on `vault-staking`.

pub mod error;
pub mod meta;
pub mod position;

pub use error::StoreError;
pub use meta::MetaStore;
pub use position::PositionStore;

/// Everything the ledger needs to persist and restore a snapshot.
pub trait LedgerStore: PositionStore + MetaStore {}

impl<T: PositionStore + MetaStore> LedgerStore for T {}
