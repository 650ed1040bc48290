//! Nullable custody: an in-memory registry of who holds each unit.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use vault_staking::{AssetCustody, CustodyError, ReceiptAck, UnitReceiver};
use vault_types::{AccountId, UnitId};

/// An in-memory asset registry for testing.
///
/// Transfers check the current holder, call the receiver hook on the way
/// in, and can be made to fail per unit.
pub struct NullCustody {
    custodian: AccountId,
    holders: Mutex<HashMap<UnitId, AccountId>>,
    failing_in: Mutex<HashSet<UnitId>>,
    failing_out: Mutex<HashSet<UnitId>>,
}

impl NullCustody {
    /// `custodian` is the account that holds units moved into custody.
    pub fn new(custodian: AccountId) -> Self {
        Self {
            custodian,
            holders: Mutex::new(HashMap::new()),
            failing_in: Mutex::new(HashSet::new()),
            failing_out: Mutex::new(HashSet::new()),
        }
    }

    pub fn custodian(&self) -> &AccountId {
        &self.custodian
    }

    /// Give `unit` to `owner` outside of any ledger flow.
    pub fn mint(&self, owner: &AccountId, unit: UnitId) {
        self.holders.lock().unwrap().insert(unit, owner.clone());
    }

    pub fn holder_of(&self, unit: UnitId) -> Option<AccountId> {
        self.holders.lock().unwrap().get(&unit).cloned()
    }

    /// Number of units currently held by the custodian.
    pub fn held_count(&self) -> usize {
        self.holders
            .lock()
            .unwrap()
            .values()
            .filter(|holder| **holder == self.custodian)
            .count()
    }

    /// Make every future `transfer_in` of `unit` fail.
    pub fn fail_transfer_in(&self, unit: UnitId) {
        self.failing_in.lock().unwrap().insert(unit);
    }

    /// Make every future `transfer_out` of `unit` fail.
    pub fn fail_transfer_out(&self, unit: UnitId) {
        self.failing_out.lock().unwrap().insert(unit);
    }

    /// Clear injected failures for `unit`.
    pub fn heal(&self, unit: UnitId) {
        self.failing_in.lock().unwrap().remove(&unit);
        self.failing_out.lock().unwrap().remove(&unit);
    }

    fn expect_holder(&self, unit: UnitId, expected: &AccountId) -> Result<(), CustodyError> {
        match self.holders.lock().unwrap().get(&unit) {
            Some(holder) if holder == expected => Ok(()),
            _ => Err(CustodyError::NotOwner {
                unit,
                expected: expected.clone(),
            }),
        }
    }
}

impl AssetCustody for NullCustody {
    fn transfer_in(
        &self,
        from: &AccountId,
        unit: UnitId,
        receiver: &dyn UnitReceiver,
    ) -> Result<(), CustodyError> {
        if self.failing_in.lock().unwrap().contains(&unit) {
            return Err(CustodyError::Other(format!("injected transfer-in failure for {unit}")));
        }
        self.expect_holder(unit, from)?;
        // The hook runs without the registry locked: receivers may query.
        if receiver.on_unit_received(&self.custodian, from, unit) != ReceiptAck::Accepted {
            return Err(CustodyError::Rejected { unit });
        }
        self.holders
            .lock()
            .unwrap()
            .insert(unit, self.custodian.clone());
        Ok(())
    }

    fn transfer_out(&self, to: &AccountId, unit: UnitId) -> Result<(), CustodyError> {
        if self.failing_out.lock().unwrap().contains(&unit) {
            return Err(CustodyError::Other(format!("injected transfer-out failure for {unit}")));
        }
        self.expect_holder(unit, &self.custodian)?;
        self.holders.lock().unwrap().insert(unit, to.clone());
        Ok(())
    }
}
