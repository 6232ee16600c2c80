use soroban_sdk::contracttype;

use crate::storage::{Config, PoolInfo, PoolRef};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigResponse {
    pub config: Config,
    /// Share of the emission reserved for the base pool, in 256ths
    pub base_ratio: u32,
    /// Sum of the weights of all weighted pools
    pub total_weight: u64,
    pub pool_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolResponse {
    pub pool_ref: PoolRef,
    /// Stored record, accounted up to `pool.last_reward_block`
    pub pool: PoolInfo,
    /// Weight of the pool in the emission split under the current weights and base ratio
    pub effective_weight: u128,
}
