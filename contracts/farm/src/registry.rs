use soroban_sdk::{log, Address, Env};

use crate::{
    accumulator::{self, EmissionSplit},
    error::ContractError,
    storage::{
        get_base_pool, get_base_ratio, get_pool, get_pool_count, get_total_weight,
        save_base_pool, save_base_ratio, save_pool, save_pool_count, save_pool_id_by_token,
        save_total_weight, Config, PoolInfo, PoolRef,
    },
    BASE_RATIO_DENOMINATOR,
};

pub fn emission_split(env: &Env) -> EmissionSplit {
    EmissionSplit::new(get_total_weight(env), get_base_ratio(env))
}

pub fn load(env: &Env, pool_ref: &PoolRef) -> Result<PoolInfo, ContractError> {
    match pool_ref {
        PoolRef::Base => Ok(get_base_pool(env)),
        PoolRef::Indexed(pool_id) => get_pool(env, *pool_id),
    }
}

pub fn store(env: &Env, pool_ref: &PoolRef, pool: &PoolInfo) {
    match pool_ref {
        PoolRef::Base => save_base_pool(env, pool),
        PoolRef::Indexed(pool_id) => save_pool(env, *pool_id, pool),
    }
}

/// Loads the pool and brings its accumulator up to `current_block` under the current weights.
/// The caller decides whether the result is persisted.
pub fn checkpointed(
    env: &Env,
    config: &Config,
    pool_ref: &PoolRef,
    current_block: u32,
) -> Result<PoolInfo, ContractError> {
    let mut pool = load(env, pool_ref)?;
    accumulator::checkpoint(
        &mut pool,
        pool_ref,
        &emission_split(env),
        config.reward_per_block,
        current_block,
    )?;

    Ok(pool)
}

/// Checkpoints the base pool and every weighted pool. Has to run before `total_weight` or
/// `base_ratio` change, otherwise ledgers that already passed would be paid out under the new
/// weights.
pub fn checkpoint_all(env: &Env, config: &Config, current_block: u32) -> Result<(), ContractError> {
    let split = emission_split(env);

    let mut base = get_base_pool(env);
    accumulator::checkpoint(
        &mut base,
        &PoolRef::Base,
        &split,
        config.reward_per_block,
        current_block,
    )?;
    save_base_pool(env, &base);

    for pool_id in 0..get_pool_count(env) {
        let pool_ref = PoolRef::Indexed(pool_id);
        let mut pool = get_pool(env, pool_id)?;
        accumulator::checkpoint(
            &mut pool,
            &pool_ref,
            &split,
            config.reward_per_block,
            current_block,
        )?;
        save_pool(env, pool_id, &pool);
    }

    Ok(())
}

/// Appends a new weighted pool. All pools must already be checkpointed at `current_block`.
pub fn register_pool(
    env: &Env,
    staked_token: &Address,
    weight: u64,
    current_block: u32,
) -> Result<u32, ContractError> {
    let pool_id = get_pool_count(env);
    let total_weight = get_total_weight(env)
        .checked_add(weight)
        .ok_or(ContractError::ContractMathError)?;

    save_pool(
        env,
        pool_id,
        &PoolInfo::new(staked_token.clone(), weight, current_block),
    );
    save_pool_id_by_token(env, staked_token, pool_id);
    save_pool_count(env, pool_id + 1);
    save_total_weight(env, total_weight);

    Ok(pool_id)
}

/// Changes the weight of a pool and returns the previous one. All pools must already be
/// checkpointed at the current block.
pub fn reweight_pool(env: &Env, pool_id: u32, weight: u64) -> Result<u64, ContractError> {
    let mut pool = get_pool(env, pool_id)?;
    let old_weight = pool.weight;

    let total_weight = get_total_weight(env)
        .checked_sub(old_weight)
        .and_then(|rest| rest.checked_add(weight))
        .ok_or(ContractError::ContractMathError)?;

    pool.weight = weight;
    save_pool(env, pool_id, &pool);
    save_total_weight(env, total_weight);

    Ok(old_weight)
}

/// Replaces the base ratio and returns the previous one. All pools must already be
/// checkpointed at the current block.
pub fn replace_base_ratio(env: &Env, base_ratio: u32) -> Result<u32, ContractError> {
    validate_base_ratio(env, base_ratio)?;

    let old_ratio = get_base_ratio(env);
    save_base_ratio(env, base_ratio);

    Ok(old_ratio)
}

pub fn validate_base_ratio(env: &Env, base_ratio: u32) -> Result<(), ContractError> {
    if base_ratio > BASE_RATIO_DENOMINATOR {
        log!(
            env,
            "Farm: Base ratio {} is above the maximum of {}",
            base_ratio,
            BASE_RATIO_DENOMINATOR
        );
        return Err(ContractError::InvalidBaseRatio);
    }

    Ok(())
}
