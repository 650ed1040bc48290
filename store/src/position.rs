use crate::StoreError;
use vault_types::AccountId;

/// Store trait for per-account staking positions.
///
/// Positions are opaque `Vec<u8>` blobs; the ledger owns the encoding.
pub trait PositionStore {
    fn get_position(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_position(&self, account: &AccountId, position: &[u8]) -> Result<(), StoreError>;
    fn iter_positions(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError>;
}
