use farm_common::ttl::{extend_persistent, extend_persistent_if_present};
use soroban_sdk::{contracttype, Address, Env};

use crate::{
    accumulator,
    error::ContractError,
    registry,
    storage::{get_config, DataKey, PoolRef},
};

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StakeEntry {
    /// Amount currently deposited in the pool
    pub amount: i128,
    /// Reward already accounted for `amount`, i.e. `amount * acc_reward_per_share / PRECISION`
    /// as of the last interaction. Only reward accrued on top of it is paid on the next one.
    pub reward_debt: u128,
}

pub fn get_stake(env: &Env, participant: &Address, pool_ref: &PoolRef) -> StakeEntry {
    let key = DataKey::Stake(participant.clone(), pool_ref.clone());
    let entry = env.storage().persistent().get(&key).unwrap_or_default();
    extend_persistent_if_present(env, &key);

    entry
}

pub fn save_stake(env: &Env, participant: &Address, pool_ref: &PoolRef, entry: &StakeEntry) {
    let key = DataKey::Stake(participant.clone(), pool_ref.clone());
    env.storage().persistent().set(&key, entry);
    extend_persistent(env, &key);
}

/// Reward `participant` could claim from the pool right now. The pool checkpoint is only
/// simulated, nothing is written.
pub fn pending_reward(
    env: &Env,
    participant: &Address,
    pool_ref: &PoolRef,
) -> Result<i128, ContractError> {
    let config = get_config(env);
    let pool = registry::checkpointed(env, &config, pool_ref, env.ledger().sequence())?;
    let entry = get_stake(env, participant, pool_ref);

    let reward = accumulator::pending_reward(env, &entry, pool.acc_reward_per_share)?;
    i128::try_from(reward).map_err(|_| ContractError::ContractMathError)
}

pub fn staked_balance(
    env: &Env,
    participant: &Address,
    pool_ref: &PoolRef,
) -> Result<i128, ContractError> {
    // unknown pools are an error rather than an empty balance
    registry::load(env, pool_ref)?;

    Ok(get_stake(env, participant, pool_ref).amount)
}
