//! Nullable condition authority: a fixed allowlist.

use std::collections::HashSet;
use std::sync::Mutex;

use vault_staking::ConditionAuthority;
use vault_types::AccountId;

pub struct NullAuthority {
    allowed: Mutex<HashSet<AccountId>>,
}

impl NullAuthority {
    /// Nobody may change conditions.
    pub fn deny_all() -> Self {
        Self::allowing(std::iter::empty())
    }

    pub fn allowing(accounts: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            allowed: Mutex::new(accounts.into_iter().collect()),
        }
    }

    pub fn grant(&self, account: &AccountId) {
        self.allowed.lock().unwrap().insert(account.clone());
    }

    pub fn revoke(&self, account: &AccountId) {
        self.allowed.lock().unwrap().remove(account);
    }
}

impl ConditionAuthority for NullAuthority {
    fn can_change_conditions(&self, caller: &AccountId) -> bool {
        self.allowed.lock().unwrap().contains(caller)
    }
}
