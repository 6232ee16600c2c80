use soroban_sdk::{contracttype, Address};

/// Pending handover of the administrator role. The proposed address has to accept
/// before `time_limit` (a ledger timestamp) passes, if one was given.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminChange {
    pub new_admin: Address,
    pub time_limit: Option<u64>,
}

impl AdminChange {
    pub fn new(new_admin: Address, time_limit: Option<u64>) -> Self {
        AdminChange {
            new_admin,
            time_limit,
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        matches!(self.time_limit, Some(limit) if now > limit)
    }
}
