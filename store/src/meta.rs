//! Metadata storage trait.

use crate::StoreError;

/// Generic key-value store for ledger-wide blobs that are not keyed by
/// account: the condition timeline, the token index, schema version.
pub trait MetaStore {
    /// Store a metadata value, replacing any previous value.
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Retrieve a metadata value, `None` if the key was never written.
    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Delete a metadata entry. Deleting an absent key is not an error.
    fn delete_meta(&self, key: &[u8]) -> Result<(), StoreError>;
}
