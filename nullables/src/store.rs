//! Nullable store: thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use vault_store::{MetaStore, PositionStore, StoreError};
use vault_types::AccountId;

/// An in-memory position + metadata store for testing.
pub struct NullStore {
    positions: Mutex<HashMap<AccountId, Vec<u8>>>,
    meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
    unavailable: Mutex<bool>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            positions: Mutex::new(HashMap::new()),
            meta: Mutex::new(HashMap::new()),
            unavailable: Mutex::new(false),
        }
    }

    /// Make every subsequent read and write fail with a backend error.
    pub fn go_offline(&self) {
        *self.unavailable.lock().unwrap() = true;
    }

    pub fn go_online(&self) {
        *self.unavailable.lock().unwrap() = false;
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if *self.unavailable.lock().unwrap() {
            return Err(StoreError::Backend("store is offline".to_string()));
        }
        Ok(())
    }

    /// Overwrite a stored blob directly, bypassing the ledger.
    pub fn corrupt_meta(&self, key: &[u8], value: &[u8]) {
        self.meta.lock().unwrap().insert(key.to_vec(), value.to_vec());
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionStore for NullStore {
    fn get_position(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_online()?;
        Ok(self.positions.lock().unwrap().get(account).cloned())
    }

    fn put_position(&self, account: &AccountId, position: &[u8]) -> Result<(), StoreError> {
        self.check_online()?;
        self.positions
            .lock()
            .unwrap()
            .insert(account.clone(), position.to_vec());
        Ok(())
    }

    fn iter_positions(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError> {
        self.check_online()?;
        Ok(self
            .positions
            .lock()
            .unwrap()
            .iter()
            .map(|(account, bytes)| (account.clone(), bytes.clone()))
            .collect())
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.check_online()?;
        self.meta.lock().unwrap().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_online()?;
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn delete_meta(&self, key: &[u8]) -> Result<(), StoreError> {
        self.check_online()?;
        self.meta.lock().unwrap().remove(key);
        Ok(())
    }
}
