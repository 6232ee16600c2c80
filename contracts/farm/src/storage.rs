use farm_common::{
    admin::AdminChange,
    ttl::{extend_persistent, extend_persistent_if_present},
};
use soroban_sdk::{contracttype, log, panic_with_error, Address, Env};

use crate::error::ContractError;

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    Admin,
    PendingAdmin,
    BaseRatio,
    TotalWeight,
    PoolCount,
    BasePool,
    Pool(u32),
    PoolByToken(Address),
    Stake(Address, PoolRef),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Token minted as reward. It is also the asset staked in the base pool.
    pub reward_token: Address,
    /// Reward units emitted per ledger, split between the base pool and the weighted pools
    pub reward_per_block: i128,
}

/// Addresses either the implicit base pool or one of the weighted pools by id.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PoolRef {
    Base,
    Indexed(u32),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    /// Token accepted as stake by this pool
    pub staked_token: Address,
    /// Allocation weight. Always 0 for the base pool, whose share is derived from `base_ratio`.
    pub weight: u64,
    /// Reward earned per staked unit since the pool was created, scaled by `PRECISION`
    pub acc_reward_per_share: u128,
    /// Ledger sequence up to which `acc_reward_per_share` is accounted
    pub last_reward_block: u32,
    /// Sum of all stake entries of this pool
    pub total_staked: i128,
}

impl PoolInfo {
    pub fn new(staked_token: Address, weight: u64, current_block: u32) -> Self {
        PoolInfo {
            staked_token,
            weight,
            acc_reward_per_share: 0,
            last_reward_block: current_block,
            total_staked: 0,
        }
    }
}

pub fn save_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_config(env: &Env) -> Config {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .unwrap_or_else(|| {
            log!(env, "Farm: Config not set");
            panic_with_error!(env, ContractError::ConfigNotSet)
        })
}

pub fn save_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_admin(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(ContractError::AdminNotSet)
}

pub fn save_pending_admin(env: &Env, change: &AdminChange) {
    env.storage().instance().set(&DataKey::PendingAdmin, change);
}

pub fn get_pending_admin(env: &Env) -> Option<AdminChange> {
    env.storage().instance().get(&DataKey::PendingAdmin)
}

pub fn remove_pending_admin(env: &Env) {
    env.storage().instance().remove(&DataKey::PendingAdmin);
}

pub fn save_base_ratio(env: &Env, base_ratio: u32) {
    env.storage().instance().set(&DataKey::BaseRatio, &base_ratio);
}

pub fn get_base_ratio(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::BaseRatio)
        .unwrap_or_else(|| {
            log!(env, "Farm: Base ratio not set");
            panic_with_error!(env, ContractError::ConfigNotSet)
        })
}

pub fn save_total_weight(env: &Env, total_weight: u64) {
    env.storage()
        .instance()
        .set(&DataKey::TotalWeight, &total_weight);
}

pub fn get_total_weight(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::TotalWeight)
        .unwrap_or(0)
}

pub fn save_pool_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::PoolCount, &count);
}

pub fn get_pool_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::PoolCount)
        .unwrap_or(0)
}

pub fn save_base_pool(env: &Env, pool: &PoolInfo) {
    env.storage().persistent().set(&DataKey::BasePool, pool);
    extend_persistent(env, &DataKey::BasePool);
}

pub fn get_base_pool(env: &Env) -> PoolInfo {
    let pool = env
        .storage()
        .persistent()
        .get(&DataKey::BasePool)
        .unwrap_or_else(|| {
            log!(env, "Farm: Base pool not set");
            panic_with_error!(env, ContractError::ConfigNotSet)
        });
    extend_persistent(env, &DataKey::BasePool);

    pool
}

pub fn save_pool(env: &Env, pool_id: u32, pool: &PoolInfo) {
    let key = DataKey::Pool(pool_id);
    env.storage().persistent().set(&key, pool);
    extend_persistent(env, &key);
}

pub fn get_pool(env: &Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
    let key = DataKey::Pool(pool_id);
    let pool = env.storage().persistent().get(&key).ok_or_else(|| {
        log!(env, "Farm: Pool {} does not exist", pool_id);
        ContractError::UnknownPool
    })?;
    extend_persistent(env, &key);

    Ok(pool)
}

pub fn save_pool_id_by_token(env: &Env, staked_token: &Address, pool_id: u32) {
    let key = DataKey::PoolByToken(staked_token.clone());
    env.storage().persistent().set(&key, &pool_id);
    extend_persistent(env, &key);
}

pub fn get_pool_id_by_token(env: &Env, staked_token: &Address) -> Option<u32> {
    let key = DataKey::PoolByToken(staked_token.clone());
    let pool_id = env.storage().persistent().get(&key);
    extend_persistent_if_present(env, &key);

    pool_id
}
