use crate::domain::Account;
use crate::ports::outbound::StakeLedger;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory stake ledger for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryStakeLedger {
    bonded: RwLock<HashMap<Account, u128>>,
}

impl InMemoryStakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bonded stake of `account`, in staking base units.
    pub fn set_bonded(&self, account: Account, amount: u128) {
        self.bonded.write().insert(account, amount);
    }

    pub fn unbond_all(&self, account: &Account) {
        self.bonded.write().remove(account);
    }
}

impl StakeLedger for InMemoryStakeLedger {
    fn bonded_stake(&self, account: &Account) -> u128 {
        self.bonded.read().get(account).copied().unwrap_or_default()
    }
}

impl<T: StakeLedger> StakeLedger for std::sync::Arc<T> {
    fn bonded_stake(&self, account: &Account) -> u128 {
        (**self).bonded_stake(account)
    }

    fn delegator_is_bonded(&self, account: &Account) -> bool {
        (**self).delegator_is_bonded(account)
    }
}
